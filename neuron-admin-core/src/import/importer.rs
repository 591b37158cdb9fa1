use super::{
    reader::read_tag_sheet,
    report::{partial_failure_message, rejection_message, UPLOAD_SUCCESS},
    shape::check_tag_table,
    transform::transform_rows,
};
use futures::future::join_all;
use neuron_admin_client::TagApi;
use neuron_admin_common::Notifier;
use neuron_admin_error::{
    import::{GroupFailure, GroupFailureCause, ImportError},
    ImportResult,
};
use neuron_admin_models::domain::prelude::{ImportBatch, PluginSchema, RawTagRow, RowGroup};
use std::{collections::HashMap, path::Path};
use tracing::{debug, info, instrument, warn};

/// Outcome of one committed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group: String,
    pub tags: usize,
}

/// Result of a fully successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub node: String,
    pub groups: Vec<GroupSummary>,
}

impl ImportReport {
    #[inline]
    pub fn total_tags(&self) -> usize {
        self.groups.iter().map(|g| g.tags).sum()
    }
}

/// Partition rows by their group column, keeping first-seen group order and
/// sheet order inside each group.
pub fn group_rows(rows: Vec<RawTagRow>) -> Vec<RowGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<RowGroup> = Vec::new();
    for row in rows {
        let group = row.group();
        match index.get(&group) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(group.clone(), groups.len());
                groups.push(RowGroup {
                    group,
                    rows: vec![row],
                });
            }
        }
    }
    groups
}

/// Imports tag sheets into the groups of a node.
///
/// `schema` is the plugin schema of the target node, resolved by the caller.
pub struct TagImporter<A, N> {
    api: A,
    notifier: N,
    schema: PluginSchema,
}

impl<A, N> TagImporter<A, N>
where
    A: TagApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N, schema: PluginSchema) -> Self {
        Self {
            api,
            notifier,
            schema,
        }
    }

    /// Read `path`, check its shape and import every group into `node`.
    #[instrument(name = "upload-tags", skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_file<P: AsRef<Path>>(&self, path: P, node: &str) -> ImportResult<ImportReport> {
        let rows = read_tag_sheet(path)?;
        if let Err(e) = check_tag_table(&rows) {
            warn!("Rejected tag table: {e}");
            self.notifier.warning(e.to_string());
            return Err(e);
        }
        self.batch_add_tags(rows, node).await
    }

    /// Validate and submit every group concurrently.
    ///
    /// Each group is decoded on its own and stops at its first bad row; a bad
    /// group does not keep other groups from being submitted. Every failure is
    /// notified and returned in [`ImportError::Groups`].
    pub async fn batch_add_tags(
        &self,
        rows: Vec<RawTagRow>,
        node: &str,
    ) -> ImportResult<ImportReport> {
        let groups = group_rows(rows);
        debug!("Submitting {} group(s) to node `{node}`", groups.len());

        let submissions = groups.iter().map(|g| async move {
            let batch = ImportBatch {
                group: g.group.clone(),
                tags: transform_rows(&g.rows, &self.schema)?,
            };
            self.api.add_tags(node, &batch.group, &batch.tags).await?;
            Ok::<_, GroupFailureCause>(batch)
        });
        let results = join_all(submissions).await;

        let mut committed = Vec::new();
        let mut failures = Vec::new();
        for (group, result) in groups.into_iter().zip(results) {
            match result {
                Ok(batch) => committed.push(GroupSummary {
                    group: batch.group,
                    tags: batch.tags.len(),
                }),
                Err(cause) => {
                    self.report_failure(&group.group, &cause);
                    failures.push(GroupFailure {
                        group: group.group,
                        cause,
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(ImportError::Groups {
                failures,
                succeeded: committed.into_iter().map(|g| g.group).collect(),
            });
        }

        info!("Imported {} group(s) into node `{node}`", committed.len());
        self.notifier.success(UPLOAD_SUCCESS);
        Ok(ImportReport {
            node: node.to_string(),
            groups: committed,
        })
    }

    fn report_failure(&self, group: &str, cause: &GroupFailureCause) {
        warn!("Group `{group}` failed: {cause}");
        match cause {
            GroupFailureCause::Rejected(rejection) => {
                self.notifier.error(rejection_message(rejection))
            }
            GroupFailureCause::Api(err) => {
                if let Some((index, code)) = err.partial_failure() {
                    self.notifier.error(partial_failure_message(index, code))
                }
            }
        }
    }
}
