// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

use super::*;

#[test]
fn no_arguments_means_no_flow_document() {
    let args = Args::try_parse_from(["frt"]).unwrap();
    assert!(args.flow.is_none());
}

#[test]
fn the_single_positional_argument_is_the_flow_path() {
    let args = Args::try_parse_from(["frt", "flow.json"]).unwrap();
    assert_eq!(args.flow.unwrap(), PathBuf::from("flow.json"));
}

#[test]
fn a_second_positional_argument_is_rejected() {
    assert!(Args::try_parse_from(["frt", "a.json", "b.json"]).is_err());
}
