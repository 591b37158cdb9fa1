mod common;

use common::{raw_row, FakeGateway};
use neuron_admin_common::{MemoryNotifier, NoticeLevel};
use neuron_admin_core::{import::report::partial_failure_message, write_tag_template, TagImporter};
use neuron_admin_error::{
    api::ApiError,
    import::{GroupFailureCause, ImportError, RejectReason, RowRejection},
};
use neuron_admin_models::{
    domain::prelude::PluginSchema,
    enums::tag::{TagAttribute, TagType},
};
use rust_xlsxwriter::Workbook;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::{sync::Barrier, time::timeout};

fn int_schema() -> PluginSchema {
    PluginSchema {
        tag_type: Some(vec![TagType::Int32, TagType::Int16]),
        fields: Vec::new(),
    }
}

#[tokio::test]
async fn single_valid_row_becomes_one_batch() {
    let gateway = FakeGateway::default();
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let report = importer
        .batch_add_tags(
            vec![raw_row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int", "value": 5}),
            )],
            "modbus",
        )
        .await
        .unwrap();

    assert_eq!(report.total_tags(), 1);
    let calls = gateway.tag_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].node, "modbus");
    assert_eq!(calls[0].group, "g1");
    let tag = &calls[0].tags[0];
    assert_eq!(tag.r#type, TagType::Int32);
    assert_eq!(tag.attribute, TagAttribute::READ);
    assert_eq!(tag.value, None);
    assert!(serde_json::to_value(tag).unwrap().get("value").is_none());
    assert_eq!(notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn static_row_without_value_submits_nothing() {
    let gateway = FakeGateway::default();
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let err = importer
        .batch_add_tags(
            vec![raw_row(
                2,
                json!({"group": "g1", "name": "t1", "address": "1", "attribute": "static", "type": "int", "value": ""}),
            )],
            "modbus",
        )
        .await
        .unwrap_err();

    let failure = err.first_failure().unwrap();
    assert_eq!(
        failure.cause,
        GroupFailureCause::Rejected(RowRejection::new(
            2,
            RejectReason::StaticWithoutValue { name: "t1".into() }
        ))
    );
    assert!(gateway.tag_calls().is_empty());
    assert_eq!(notifier.count(NoticeLevel::Error), 1);
    assert_eq!(notifier.count(NoticeLevel::Success), 0);
}

#[tokio::test]
async fn each_group_is_submitted_once() {
    // Both submissions must be in flight together to pass the barrier
    let gateway = FakeGateway {
        tag_barrier: Some(Arc::new(Barrier::new(2))),
        ..FakeGateway::default()
    };
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let report = importer
        .batch_add_tags(
            vec![
                raw_row(2, json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int"})),
                raw_row(3, json!({"group": "g2", "name": "t2", "address": "2", "attribute": "write", "type": "int16"})),
            ],
            "modbus",
        );
    let report = timeout(Duration::from_secs(5), report)
        .await
        .expect("group submissions ran one after another")
        .unwrap();

    let groups: Vec<&str> = report.groups.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(groups, vec!["g1", "g2"]);
    let mut called: Vec<String> = gateway.tag_calls().into_iter().map(|c| c.group).collect();
    called.sort();
    assert_eq!(called, vec!["g1", "g2"]);
    assert_eq!(notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn every_failed_group_is_reported() {
    let mut gateway = FakeGateway::default();
    gateway.tag_failures.insert(
        "g3".into(),
        ApiError::Backend {
            code: 2202,
            index: Some(1),
        },
    );
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let err = importer
        .batch_add_tags(
            vec![
                raw_row(2, json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int"})),
                raw_row(3, json!({"group": "g2", "name": "t2", "address": "2", "attribute": "bogus", "type": "int"})),
                raw_row(4, json!({"group": "g3", "name": "t3", "address": "3", "attribute": "read", "type": "int"})),
                raw_row(5, json!({"group": "g3", "name": "t4", "address": "4", "attribute": "read", "type": "int"})),
            ],
            "modbus",
        )
        .await
        .unwrap_err();

    let ImportError::Groups { failures, succeeded } = err else {
        panic!("expected group failures");
    };
    assert_eq!(succeeded, vec!["g1".to_string()]);
    let failed: Vec<&str> = failures.iter().map(|f| f.group.as_str()).collect();
    assert_eq!(failed, vec!["g2", "g3"]);

    // g2 is refused locally, g1 and g3 reach the gateway
    assert_eq!(gateway.tag_calls().len(), 2);

    let errors: Vec<String> = notifier
        .notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .map(|n| n.message)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&partial_failure_message(1, 2202)));
    assert!(errors.iter().any(|m| m.contains("Row 3")));
    assert_eq!(notifier.count(NoticeLevel::Success), 0);
}

#[tokio::test]
async fn opaque_backend_failure_is_not_notified() {
    let mut gateway = FakeGateway::default();
    gateway
        .tag_failures
        .insert("g1".into(), ApiError::Transport("connection refused".into()));
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let err = importer
        .batch_add_tags(
            vec![raw_row(2, json!({"group": "g1", "name": "t1", "address": "1", "attribute": "read", "type": "int"}))],
            "modbus",
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.first_failure().map(|f| f.cause.clone()),
        Some(GroupFailureCause::Api(ApiError::Transport(
            "connection refused".into()
        )))
    );
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn upload_reads_sheet_and_submits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tags.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in ["Group", "Name", "Address", "Attribute", "Type", "Value"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    sheet.write_string(1, 0, "g1").unwrap();
    sheet.write_string(1, 1, "t1").unwrap();
    sheet.write_number(1, 2, 40001).unwrap();
    sheet.write_string(1, 3, "Read,Static").unwrap();
    sheet.write_string(1, 4, "INT16").unwrap();
    sheet.write_number(1, 5, 12).unwrap();
    workbook.save(&path).unwrap();

    let gateway = FakeGateway::default();
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());
    let report = importer.upload_file(&path, "modbus").await.unwrap();

    assert_eq!(report.total_tags(), 1);
    let calls = gateway.tag_calls();
    let tag = &calls[0].tags[0];
    assert_eq!(tag.address, "40001");
    assert!(tag.attribute.is_static());
    assert_eq!(tag.value, Some(12.into()));
}

#[tokio::test]
async fn malformed_or_empty_sheet_warns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.xlsx");
    write_tag_template(&path, false).unwrap();

    let gateway = FakeGateway::default();
    let notifier = MemoryNotifier::new();
    let importer = TagImporter::new(&gateway, &notifier, int_schema());

    let err = importer.upload_file(&path, "modbus").await.unwrap_err();
    assert_eq!(err, ImportError::EmptyTable);
    assert_eq!(notifier.count(NoticeLevel::Warning), 1);

    let path = dir.path().join("partial.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "group").unwrap();
    sheet.write_string(0, 1, "name").unwrap();
    sheet.write_string(1, 0, "g1").unwrap();
    sheet.write_string(1, 1, "t1").unwrap();
    workbook.save(&path).unwrap();

    let err = importer.upload_file(&path, "modbus").await.unwrap_err();
    assert!(matches!(err, ImportError::MalformedTable { .. }));
    assert_eq!(notifier.count(NoticeLevel::Warning), 2);
    assert!(gateway.tag_calls().is_empty());
}
