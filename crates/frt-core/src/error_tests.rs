// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

use super::*;

#[yare::parameterized(
    duplicate_node_id  = { CoreError::DuplicateNodeId("n1".into()),       StatusCode::InvalidInParam },
    duplicate_type_tag = { CoreError::DuplicateTypeTag("inject".into()),  StatusCode::InvalidInParam },
    node_not_found     = { CoreError::NodeNotFound("ghost".into()),       StatusCode::NotFound },
    out_of_memory      = { CoreError::OutOfMemory(64),                    StatusCode::OutOfMem },
    sentinel           = { CoreError::SentinelCorrupted("tail"),          StatusCode::Error },
    not_supported      = { CoreError::NotSupported,                       StatusCode::NotSupported },
    invalid_in_param   = { CoreError::InvalidInParam("bad".into()),       StatusCode::InvalidInParam },
    invalid_config     = { CoreError::InvalidConfig("bad".into()),        StatusCode::InvalidInParam },
    invalid_state      = { CoreError::InvalidState("stopped".into()),     StatusCode::InvalidState },
    timeout            = { CoreError::Timeout,                            StatusCode::Timeout },
)]
fn every_core_error_maps_onto_the_stable_status_contract(err: CoreError, expected: StatusCode) {
    assert_eq!(StatusCode::from(&err), expected);
}

#[test]
fn too_many_wires_is_an_invalid_in_param() {
    let err = CoreError::TooManyWires { node: "n1".into(), count: 5, limit: 4 };
    assert_eq!(StatusCode::from(err), StatusCode::InvalidInParam);
}
