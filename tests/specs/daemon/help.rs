//! sqsd argument handling specs

use crate::prelude::*;

#[test]
fn sqsd_help_shows_usage() {
    daemon()
        .args(&["--help"])
        .passes()
        .stdout_has("USAGE:")
        .stdout_has("--config");
}

#[test]
fn sqsd_version_shows_version() {
    daemon().args(&["-V"]).passes().stdout_has("sqsd 0.1");
}

#[test]
fn sqsd_rejects_unknown_argument() {
    daemon()
        .args(&["--foreground"])
        .fails()
        .code(2)
        .stderr_has("unexpected argument '--foreground'");
}
