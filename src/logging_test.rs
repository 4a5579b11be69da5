use super::*;

#[test]
fn development_logs_debug() {
    assert_eq!(level_for(BuildEnvironment::Development), log::Level::Debug);
}

#[test]
fn production_logs_warnings_only() {
    assert_eq!(level_for(BuildEnvironment::Production), log::Level::Warn);
}

#[test]
fn init_is_callable_repeatedly() {
    init(BuildEnvironment::Development);
    init(BuildEnvironment::Production);
}
