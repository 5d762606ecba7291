/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Request encoding and response decoding for the data service.
//!
//! Requests are form-encoded with repeated keys for lists
//! (`sess_id_list=1&sess_id_list=2`). List responses carry a `data`
//! array of display cells and a parallel `attrs` array whose `id` is
//! the composite row key and whose `class` holds whitespace separated
//! markers (`access_mg`, `trash`).

use serde::Deserialize;
use serde_json::Value;

use crate::id_dict::IdDictionary;
use crate::level::Level;
use crate::level::RowId;
use crate::panel::Row;
use crate::service::ServiceError;
use crate::service::TransferOutcome;
use crate::service::TrashView;

pub const LIST_QUERY: &str = "list_query";
pub const TRANSFER_SESSIONS: &str = "transfer_sessions";
pub const TRASH: &str = "trash";
pub const GET_TRASH_FLAG: &str = "get_trash_flag";
pub const SET_TRASH_FLAG: &str = "set_trash_flag";
pub const DOWNLOAD: &str = "download";

const ACCESS_MG_MARKER: &str = "access_mg";
const TRASH_MARKER: &str = "trash";

pub type Form = Vec<(&'static str, String)>;

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    #[serde(default)]
    pub attrs: Vec<RowAttrs>,
}

#[derive(Debug, Deserialize)]
pub struct RowAttrs {
    pub id: String,
    #[serde(default)]
    pub class: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    #[serde(default)]
    pub untrashed: bool,
}

#[derive(Debug, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
}

pub fn list_form(level: Level, parent: Option<u64>) -> Result<Form, ServiceError> {
    match (level.parent(), parent) {
        (None, _) => Ok(vec![(level.list_param(), "true".to_string())]),
        (Some(_), Some(parent)) => Ok(vec![(level.list_param(), parent.to_string())]),
        (Some(parent_level), None) => Err(ServiceError::InvalidRequest(format!(
            "listing {} requires a selected {}",
            level.title(),
            parent_level.key()
        ))),
    }
}

pub fn transfer_form(sessions: &[u64], experiment: u64) -> Form {
    let mut form: Form = sessions
        .iter()
        .map(|id| ("sess_id_list", id.to_string()))
        .collect();
    form.push(("exp_id", experiment.to_string()));
    form
}

pub fn trash_form(ids: &IdDictionary) -> Form {
    ids.form_pairs()
}

pub fn set_trash_form(view: TrashView) -> Form {
    vec![("trash_flag", view.flag().to_string())]
}

pub fn download_form(ids: &IdDictionary) -> Result<Form, ServiceError> {
    let encoded =
        serde_json::to_string(ids).map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
    Ok(vec![("id_dict", encoded)])
}

/// Decode a list response into rows, checking every row belongs to
/// `level`.
pub fn rows_from_list(level: Level, response: ListResponse) -> Result<Vec<Row>, ServiceError> {
    if !response.success {
        return Err(ServiceError::Rejected);
    }
    if response.data.len() != response.attrs.len() {
        return Err(ServiceError::Malformed(format!(
            "{} rows but {} attribute entries",
            response.data.len(),
            response.attrs.len()
        )));
    }
    response
        .data
        .into_iter()
        .zip(response.attrs)
        .map(|(cells, attrs)| {
            let id: RowId = attrs
                .id
                .parse()
                .map_err(|e| ServiceError::Malformed(format!("{}", e)))?;
            if id.level != level {
                return Err(ServiceError::Malformed(format!(
                    "row {} listed among {}",
                    id,
                    level.title()
                )));
            }
            let classes: Vec<&str> = attrs.class.split_whitespace().collect();
            Ok(Row {
                id,
                cells: cells.iter().map(cell_text).collect(),
                access_mg: classes.contains(&ACCESS_MG_MARKER),
                trash: classes.contains(&TRASH_MARKER),
            })
        })
        .collect()
}

pub fn transfer_outcome(response: TransferResponse) -> Result<TransferOutcome, ServiceError> {
    if response.success {
        Ok(TransferOutcome {
            untrashed: response.untrashed,
        })
    } else {
        Err(ServiceError::Rejected)
    }
}

pub fn mutation_outcome(response: MutationResponse) -> Result<(), ServiceError> {
    if response.success {
        Ok(())
    } else {
        Err(ServiceError::Rejected)
    }
}

/// The trash flag comes back as a bare JSON value: `0`/`1`,
/// `false`/`true`, or the same digits as a string.
pub fn trash_view_from_value(value: &Value) -> Result<TrashView, ServiceError> {
    let flag = match value {
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    flag.and_then(TrashView::from_flag)
        .ok_or_else(|| ServiceError::Malformed(format!("unexpected trash flag {}", value)))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn list(value: Value) -> ListResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn list_form_uses_level_parameter() {
        assert_eq!(
            list_form(Level::Experiment, None).unwrap(),
            vec![("exp_list", "true".to_string())]
        );
        assert_eq!(
            list_form(Level::Session, Some(1)).unwrap(),
            vec![("sess_list", "1".to_string())]
        );
        assert_eq!(
            list_form(Level::Dataset, Some(40)).unwrap(),
            vec![("dataset_list", "40".to_string())]
        );
        assert!(matches!(
            list_form(Level::Epoch, None),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn transfer_form_repeats_session_ids() {
        assert_eq!(
            transfer_form(&[7, 8], 3),
            vec![
                ("sess_id_list", "7".to_string()),
                ("sess_id_list", "8".to_string()),
                ("exp_id", "3".to_string()),
            ]
        );
    }

    #[test]
    fn rows_decode_markers_and_cells() {
        let rows = rows_from_list(
            Level::Experiment,
            list(json!({
                "success": true,
                "data": [["alpha", 2012, null], ["beta", "x", true]],
                "attrs": [
                    {"id": "exp_1", "class": "access_mg"},
                    {"id": "exp_2", "class": "trash  other"}
                ]
            })),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, RowId::new(Level::Experiment, 1));
        assert_eq!(rows[0].cells, vec!["alpha", "2012", ""]);
        assert!(rows[0].access_mg);
        assert!(!rows[0].trash);
        assert!(!rows[1].access_mg);
        assert!(rows[1].trash);
        assert_eq!(rows[1].cells, vec!["beta", "x", "true"]);
    }

    #[test]
    fn rows_missing_class_default_to_no_markers() {
        let rows = rows_from_list(
            Level::Epoch,
            list(json!({"success": true, "data": [["e"]], "attrs": [{"id": "epoch_4"}]})),
        )
        .unwrap();
        assert!(!rows[0].access_mg && !rows[0].trash);
    }

    #[test]
    fn unsuccessful_list_is_rejected() {
        assert_eq!(
            rows_from_list(Level::Session, list(json!({"success": false}))),
            Err(ServiceError::Rejected)
        );
    }

    #[test]
    fn rows_from_wrong_level_are_malformed() {
        let result = rows_from_list(
            Level::Session,
            list(json!({"success": true, "data": [["x"]], "attrs": [{"id": "epoch_1"}]})),
        );
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn mismatched_attrs_are_malformed() {
        let result = rows_from_list(
            Level::Session,
            list(json!({"success": true, "data": [["x"], ["y"]], "attrs": [{"id": "sess_1"}]})),
        );
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn transfer_reply_carries_untrashed() {
        let reply: TransferResponse =
            serde_json::from_value(json!({"success": true, "untrashed": true})).unwrap();
        assert_eq!(
            transfer_outcome(reply),
            Ok(TransferOutcome { untrashed: true })
        );
        let reply: TransferResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(transfer_outcome(reply), Ok(TransferOutcome::default()));
        let reply: TransferResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(transfer_outcome(reply), Err(ServiceError::Rejected));
    }

    #[test]
    fn trash_flag_accepts_numbers_bools_and_strings() {
        assert_eq!(trash_view_from_value(&json!(0)), Ok(TrashView::Active));
        assert_eq!(trash_view_from_value(&json!(1)), Ok(TrashView::Trash));
        assert_eq!(trash_view_from_value(&json!(true)), Ok(TrashView::Trash));
        assert_eq!(trash_view_from_value(&json!("0")), Ok(TrashView::Active));
        assert!(trash_view_from_value(&json!(2)).is_err());
        assert!(trash_view_from_value(&json!(null)).is_err());
    }

    #[test]
    fn download_form_embeds_json_dictionary() {
        let ids: IdDictionary = [RowId::new(Level::Dataset, 5)].into_iter().collect();
        assert_eq!(
            download_form(&ids).unwrap(),
            vec![("id_dict", r#"{"dataset":[5]}"#.to_string())]
        );
        assert_eq!(
            set_trash_form(TrashView::Trash),
            vec![("trash_flag", "1".to_string())]
        );
    }
}
