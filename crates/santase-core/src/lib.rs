#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;
pub mod rules;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "santase"
    }

    pub const fn codename() -> &'static str {
        "Sixty-Six"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "santase");
        assert_eq!(AppInfo::codename(), "Sixty-Six");
        assert!(!AppInfo::version().is_empty());
    }
}
