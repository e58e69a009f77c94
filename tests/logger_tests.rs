//! Log backend installation tests.

use log::LevelFilter;
use servio::logger;

/// Tests that only the first install succeeds and sets the filter.
#[test]
fn test_logger_single_install() {
    let first = logger::init(LevelFilter::Debug);
    if first {
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }

    assert!(!logger::init(LevelFilter::Trace));
    assert_ne!(log::max_level(), LevelFilter::Trace);
}
