use super::*;

#[test]
fn parse_entry_point() {
    let entry: EntryPoint = "Main.__default.Run".parse().unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(entry.module, "Main");
    assert_eq!(entry.class, "__default");
    assert_eq!(entry.method, "Run");
    assert_eq!(entry.to_string(), "Main.__default.Run");
}

#[test]
fn nested_module_names_keep_their_dots() {
    let entry: Result<EntryPoint, _> = "A.B.C.M".parse();
    assert_eq!(
        entry,
        Ok(EntryPoint {
            module: "A.B".into(),
            class: "C".into(),
            method: "M".into(),
        })
    );
}

#[test]
fn rejects_short_paths() {
    assert!("Main".parse::<EntryPoint>().is_err());
    assert!("C.M".parse::<EntryPoint>().is_err());
    assert!("M..X".parse::<EntryPoint>().is_err());
}

#[test]
fn defaults() {
    let opts = CodegenOptions::default();
    assert_eq!(opts.runtime, "_vela");
    assert!(!opts.annotate_types);
    assert!(opts.entry_point.is_none());
}
