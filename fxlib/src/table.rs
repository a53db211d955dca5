use crate::errors::FxLibResult;
use crate::known_framework_reference::{KnownFrameworkReference, RawKnownFrameworkReference};
use crate::target_framework::TargetFramework;
use crate::version::FxVersion;
use log::debug;
use logging_timer::{finish, timer};
use std::collections::{BTreeSet, HashMap};
use unicase::UniCase;

/// The known framework references for one build evaluation. Read-only once
/// loaded.
#[derive(Debug, Default, Clone)]
pub struct KnownFrameworkReferenceTable {
    rows: Vec<KnownFrameworkReference>,

    /// Row indexes per name, sorted ascending by (framework version,
    /// platform version, table position).
    by_name: HashMap<UniCase<String>, Vec<usize>>,
}

impl KnownFrameworkReferenceTable {
    /// Builds a table from rows that are already validated. Duplicate
    /// (name, target framework) pairs are allowed; the later row wins.
    pub fn load(rows: Vec<KnownFrameworkReference>) -> Self {
        let mut by_name: HashMap<UniCase<String>, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_name.entry(UniCase::new(row.name.clone())).or_default().push(idx);
        }

        for indexes in by_name.values_mut() {
            indexes.sort_by(|&a, &b| {
                let ra = &rows[a];
                let rb = &rows[b];
                ra.target_framework.version.cmp(&rb.target_framework.version)
                    .then_with(|| ra.platform_version().cmp(&rb.platform_version()))
                    .then(a.cmp(&b))
            });
        }

        KnownFrameworkReferenceTable { rows, by_name }
    }

    /// Validates and loads host supplied rows. A single malformed row fails
    /// the whole load.
    pub fn from_raw(raw_rows: &[RawKnownFrameworkReference]) -> FxLibResult<Self> {
        let tmr = timer!("Load Known Framework References");

        let rows = raw_rows.iter()
            .map(|raw| raw.validate())
            .collect::<FxLibResult<Vec<_>>>()?;

        let table = Self::load(rows);
        finish!(tmr, "NumRows={} NumNames={}", table.len(), table.by_name.len());
        Ok(table)
    }

    /// Loads a JSON array of raw rows.
    pub fn from_json(json: &str) -> FxLibResult<Self> {
        let raw_rows: Vec<RawKnownFrameworkReference> = serde_json::from_str(json)?;
        Self::from_raw(&raw_rows)
    }

    pub fn rows(&self) -> &[KnownFrameworkReference] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows with the given name, in table order.
    pub fn find_rows(&self, name: &str) -> Vec<&KnownFrameworkReference> {
        let mut indexes = match self.by_name.get(&UniCase::new(name.to_owned())) {
            Some(indexes) => indexes.clone(),
            None => return vec![],
        };

        indexes.sort_unstable();
        indexes.into_iter().map(|idx| &self.rows[idx]).collect()
    }

    /// The closest applicable row: the one with the greatest framework
    /// version (then platform version) that `effective` still satisfies.
    /// Remaining ties go to the row that appears last in the table.
    pub fn find_best_row(&self, name: &str, effective: &TargetFramework) -> Option<&KnownFrameworkReference> {
        let indexes = self.by_name.get(&UniCase::new(name.to_owned()))?;

        // Everything past this point declares a newer framework version.
        let end = indexes.partition_point(|&idx| self.rows[idx].target_framework.version <= effective.version);

        let best = indexes[..end].iter().rev()
            .map(|&idx| &self.rows[idx])
            .find(|row| row.applies_to(effective));

        debug!("Best row for {} on {} is {:?}", name, effective, best.map(|r| r.target_framework.to_string()));
        best
    }

    /// The distinct platform versions declared by any row, ascending.
    pub fn platform_versions(&self) -> BTreeSet<FxVersion> {
        self.platform_versions_where(|_| true)
    }

    /// The distinct platform versions declared by rows for the given platform.
    pub fn platform_versions_for(&self, platform_identifier: &str) -> BTreeSet<FxVersion> {
        self.platform_versions_where(|row| {
            row.target_framework.platform_identifier()
                .map(|id| unicase::eq_ascii(id, platform_identifier))
                .unwrap_or(false)
        })
    }

    fn platform_versions_where<F>(&self, predicate: F) -> BTreeSet<FxVersion>
    where F: Fn(&KnownFrameworkReference) -> bool
    {
        self.rows.iter()
            .filter(|row| predicate(row))
            .filter_map(|row| row.platform_version().cloned())
            .collect()
    }
}
