mod aging;
mod common;
mod readiness;
