//! Library pieces the `kestrelc` binary is built from: file naming and the
//! stage named after a diagnostic.

use std::path::Path;

use kestrelc::{SOURCE_EXTENSION, compile, output_path, source_path};

#[test]
fn source_and_output_paths() {
    assert_eq!(SOURCE_EXTENSION, "4280fs24");
    assert_eq!(source_path("prog"), Path::new("prog.4280fs24"));
    assert_eq!(output_path("prog"), Path::new("prog.asm"));
    // the base is used verbatim, dots included
    assert_eq!(source_path("dir/p.v2"), Path::new("dir/p.v2.4280fs24"));
    assert_eq!(output_path("dir/p.v2"), Path::new("dir/p.v2.asm"));
}

#[test]
fn failure_stage_follows_error_kind() {
    let cases = [
        ("program start print 1 $ ; stop", "Parse Failure"),
        ("program start print 1 stop", "Parse Failure"),
        ("program start print y ; stop", "Static Semantics Failure"),
        ("program var a , 1 a , 2 ; start print a ; stop", "Static Semantics Failure"),
    ];
    for (src, stage) in cases {
        let err = compile(src).unwrap_err();
        assert_eq!(err.stage(), stage, "{src:?}: {err}");
    }
}
