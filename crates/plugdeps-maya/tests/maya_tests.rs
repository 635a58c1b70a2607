use std::fs::{self, File};
use std::io::BufReader;

use plugdeps_maya::{HEADER_PREFIX, ParseError, parse, parse_str};
use tempfile::TempDir;

const SHOT: &str = r#"//Maya ASCII 2022 scene
//Name: sh010_lgt.ma
//Last modified: Tue, Mar 01, 2022 10:00:00 AM
//Codeset: UTF-8
requires maya "2022";
requires -nodeType "RedshiftOptions" -nodeType "RedshiftMaterial" "redshift4maya" "3.0.64";
requires -nodeType "xgmSplineDescription" -dataType "xgmSplineData"
		 "xgenToolkit" "1.0";
requires "stereoCamera" "10.0";
currentUnit -l centimeter -a degree -t film;
fileInfo "application" "maya";
fileInfo "comment" "uses \"quotes\"; and semicolons";
createNode transform -s -n "persp";
	rename -uid "8A1D2F00-0000-0000-0000-000000000001";
	setAttr ".v" no;
	setAttr ".t" -type "double3" 28 21 28 ;
createNode script -n "uiConfigurationScriptNode";
	setAttr ".b" -type "string" "// a comment inside a string; requires \"fake\";\n";
// End of sh010_lgt.ma
"#;

#[test]
fn test_parse_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sh010_lgt.ma");
    fs::write(&path, SHOT).unwrap();

    let scene = parse(BufReader::new(File::open(&path).unwrap())).unwrap();
    let names: Vec<_> = scene.plugin_names().collect();

    assert_eq!(names, vec!["maya", "redshift4maya", "xgenToolkit", "stereoCamera"]);
    assert_eq!(scene.header_version.as_deref(), Some("2022"));
}

#[test]
fn test_requires_inside_strings_are_not_statements() {
    let scene = parse_str(SHOT).unwrap();
    assert!(scene.plugin_names().all(|name| name != "fake"));
}

#[test]
fn test_multiline_requires() {
    let scene = parse_str(SHOT).unwrap();
    let xgen = scene
        .requires
        .iter()
        .find(|r| r.name == "xgenToolkit")
        .unwrap();

    assert_eq!(xgen.node_types, vec!["xgmSplineDescription"]);
    assert_eq!(xgen.data_types, vec!["xgmSplineData"]);
    assert_eq!(xgen.version.as_deref(), Some("1.0"));
    assert_eq!(xgen.line, 7);
}

#[test]
fn test_header_prefix() {
    assert!(SHOT.starts_with(HEADER_PREFIX));
    assert!(matches!(
        parse_str("//Maya Binary 2022\n"),
        Err(ParseError::MissingHeader)
    ));
    assert!(matches!(parse_str(""), Err(ParseError::MissingHeader)));
}

#[test]
fn test_truncated_file_is_an_error() {
    let truncated = &SHOT[..SHOT.find("currentUnit").unwrap() + "currentUnit -l".len()];
    let err = parse_str(truncated).unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedStatement { line: 10 }));
    assert!(!err.is_io());
}

#[test]
fn test_non_utf8_bytes_are_tolerated() {
    let mut bytes = b"//Maya ASCII 2018 scene\nfileInfo \"comment\" \"".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"\";\nrequires \"mtoa\" \"3.0\";\n");

    let scene = plugdeps_maya::parse_bytes(&bytes).unwrap();
    assert_eq!(scene.requires.len(), 1);
}
