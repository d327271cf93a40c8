//! Process-wide executable configuration
//!
//! Kept in its own test binary: the configured path is fixed once per
//! process, so no other test may resolve it first.

use std::path::Path;

use implore_gnuplot::{executable, GnuplotError};

#[test]
fn test_custom_path_is_fixed_once() {
    let custom = Path::new("/opt/gnuplot/bin/gnuplot");
    executable::set_custom_path(custom).unwrap();
    assert_eq!(executable::configured(), Some(custom));
    assert_eq!(executable::resolve().unwrap(), custom);

    let err = executable::set_custom_path("/usr/bin/gnuplot").unwrap_err();
    assert!(matches!(
        err,
        GnuplotError::ExecutableAlreadyConfigured { ref path } if path == custom
    ));
    assert_eq!(executable::resolve().unwrap(), custom);
}
