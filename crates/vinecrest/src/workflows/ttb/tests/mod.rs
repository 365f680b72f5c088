mod common;
mod tax_class;
