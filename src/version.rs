const fn version_or_cargo(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Build version, overridable with `APP_VERSION` at compile time.
pub const VERSION: &str = version_or_cargo(option_env!("APP_VERSION"));
