//! Account-group hierarchy over flat report lines.
//!
//! Runs of account lines are nested under synthetic header lines built from
//! the account group ancestry (or the account code prefixes), and every
//! header carries the column sums of everything beneath it. Lines that are
//! not account lines split the input into independent sections.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::iter;

use rust_decimal::Decimal;
use tbfx_shared::ReportConfig;
use tbfx_shared::types::AccountId;
use tracing::debug;

use super::error::ReportError;
use super::sources::{Account, AccountDirectory};
use super::types::{CellValue, Column, LineId, ReportContext, ReportLine, ReportOptions};
use crate::currency::{AmountFormatter, Currency};

/// Aggregate of text cells that do not agree.
pub const NOT_APPLICABLE: &str = "n/a";

const ITALIC_STYLE: &str = "font-style:italic;";
const ELLIPSIS: &str = "...";
const ACCOUNT_CODE_PREFIX_LEN: usize = 3;

/// Sort bucket of a group key. Real groups sort before the no-group bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortPriority {
    /// Account groups and code prefixes.
    Most = 0,
    /// The synthetic "(No Group)" bucket.
    Least = 99,
}

/// Key of a hierarchy level, ordered by priority then label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// Sort bucket.
    pub priority: SortPriority,
    /// Group label.
    pub label: String,
}

impl GroupKey {
    /// Key of a real group or code prefix.
    #[must_use]
    pub fn most(label: impl Into<String>) -> Self {
        Self {
            priority: SortPriority::Most,
            label: label.into(),
        }
    }

    /// Key of the no-group bucket.
    #[must_use]
    pub fn least(label: impl Into<String>) -> Self {
        Self {
            priority: SortPriority::Least,
            label: label.into(),
        }
    }

    /// Identifier of the header line for this key.
    #[must_use]
    pub fn header_id(&self) -> LineId {
        LineId::hierarchy(&self.label)
    }
}

/// Node of the transient grouping tree.
///
/// `depth` and `parent_id` are set by the first insertion that reaches the
/// node and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Level given to the header lines of this node's children.
    pub depth: Option<u32>,
    /// Parent given to the header lines of this node's children.
    pub parent_id: Option<LineId>,
    /// Sub-groups, iterated in key order.
    pub children: BTreeMap<GroupKey, HierarchyNode>,
    /// Lines filed directly at this level.
    pub lines: Vec<ReportLine>,
}

impl HierarchyNode {
    /// Whether nothing was ever inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depth.is_none() && self.children.is_empty() && self.lines.is_empty()
    }

    /// Files `line` under `path`, creating intermediate nodes.
    ///
    /// The line lands in the node of the last key and is re-parented to that
    /// key's header. An empty path inserts nothing.
    pub fn insert(&mut self, parent_id: LineId, path: &[GroupKey], mut line: ReportLine, depth: u32) {
        let Some((key, rest)) = path.split_first() else {
            return;
        };
        self.depth.get_or_insert(depth);
        self.parent_id.get_or_insert(parent_id);

        let child = self.children.entry(key.clone()).or_default();
        if rest.is_empty() {
            line.parent_id = Some(key.header_id());
            child.lines.push(line);
        } else {
            child.insert(key.header_id(), rest, line, depth + 1);
        }
    }

    /// Deep-merges `other` into `self`: children are merged key by key,
    /// lines are appended, and scalars keep their first value.
    pub fn merge(&mut self, other: Self) {
        if self.depth.is_none() {
            self.depth = other.depth;
        }
        if self.parent_id.is_none() {
            self.parent_id = other.parent_id;
        }
        self.lines.extend(other.lines);
        for (key, child) in other.children {
            match self.children.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(child);
                }
                Entry::Occupied(mut entry) => entry.get_mut().merge(child),
            }
        }
    }
}

/// Sums rows of raw column values element-wise.
///
/// Numbers add up. A position holding any text cell aggregates to text:
/// empty when every text cell is blank (empty or already [`NOT_APPLICABLE`]),
/// [`NOT_APPLICABLE`] otherwise. Short rows count as zero in the missing
/// positions, and no rows at all give `width` zeros.
#[must_use]
pub fn merge_columns(rows: &[Vec<CellValue>], width: usize) -> Vec<CellValue> {
    let width = rows.iter().map(Vec::len).fold(width, usize::max);

    (0..width)
        .map(|i| {
            let cells = rows.iter().filter_map(|row| row.get(i));
            let mut sum = Decimal::ZERO;
            let mut has_text = false;
            let mut all_blank = true;
            for cell in cells {
                match cell {
                    CellValue::Number(value) => sum += *value,
                    CellValue::Text(text) => {
                        has_text = true;
                        all_blank &= text.is_empty() || text == NOT_APPLICABLE;
                    }
                }
            }
            match (has_text, all_blank) {
                (false, _) => CellValue::Number(sum),
                (true, true) => CellValue::Text(String::new()),
                (true, false) => CellValue::Text(NOT_APPLICABLE.to_string()),
            }
        })
        .collect()
}

/// Builds the grouped trial balance lines.
pub struct HierarchyBuilder<'a, D: AccountDirectory + ?Sized> {
    accounts: &'a D,
    formatter: AmountFormatter<'a>,
    config: &'a ReportConfig,
}

/// Flattening parameters shared by every level.
struct FlattenScope<'o> {
    options: &'o ReportOptions,
    unfold_all: bool,
    width: usize,
}

impl<'a, D: AccountDirectory + ?Sized> HierarchyBuilder<'a, D> {
    /// Creates a builder formatting header sums in `currency`.
    pub const fn new(accounts: &'a D, currency: &'a Currency, config: &'a ReportConfig) -> Self {
        Self {
            accounts,
            formatter: AmountFormatter::new(currency),
            config,
        }
    }

    /// Nests account lines under their group headers.
    ///
    /// Input with no account line comes back unchanged. Lookup failures
    /// from the account directory propagate.
    pub fn build(
        &self,
        lines: Vec<ReportLine>,
        options: &ReportOptions,
        ctx: &ReportContext,
    ) -> Result<Vec<ReportLine>, ReportError> {
        if lines.iter().all(|line| line.grouping_account().is_none()) {
            return Ok(lines);
        }

        let scope = FlattenScope {
            options,
            unfold_all: options.unfold_all || (ctx.print_mode && options.unfolded_lines.is_empty()),
            width: lines.iter().map(|line| line.columns.len()).max().unwrap_or(0),
        };
        debug!(lines = lines.len(), unfold_all = scope.unfold_all, "building account hierarchy");

        let mut cache: HashMap<AccountId, Account> = HashMap::new();
        let mut tree = HierarchyNode::default();
        let mut no_group: Vec<ReportLine> = Vec::new();
        let mut output = Vec::with_capacity(lines.len());

        for item in lines.into_iter().map(Some).chain(iter::once(None)) {
            let account_id = item.as_ref().and_then(ReportLine::grouping_account);
            match (item, account_id) {
                (Some(line), Some(account_id)) => {
                    let account = self.resolve(&mut cache, account_id)?;
                    if account.group_id.is_none() {
                        no_group.push(line);
                        continue;
                    }
                    let path = self.account_path(&account)?;
                    let (section, depth) = (section_of(&line), depth_of(&line));
                    tree.insert(section, &path, line, depth);
                }
                (flush_point, _) => {
                    self.file_no_group(&mut tree, std::mem::take(&mut no_group), &mut cache)?;
                    if !tree.is_empty() {
                        let (_, grouped) = self.flatten(std::mem::take(&mut tree), &scope);
                        debug!(grouped = grouped.len(), "flushed account hierarchy");
                        output.extend(grouped);
                    }
                    output.extend(flush_point);
                }
            }
        }

        Ok(output)
    }

    fn resolve(
        &self,
        cache: &mut HashMap<AccountId, Account>,
        id: AccountId,
    ) -> Result<Account, ReportError> {
        if let Some(account) = cache.get(&id) {
            return Ok(account.clone());
        }
        let account = self.accounts.account(id)?;
        cache.insert(id, account.clone());
        Ok(account)
    }

    /// Group ancestry of `account`, outermost first, or its code prefixes
    /// when it has no group.
    fn account_path(&self, account: &Account) -> Result<Vec<GroupKey>, ReportError> {
        let mut keys = Vec::new();

        if account.group_id.is_some() {
            let mut seen = HashSet::new();
            let mut next = account.group_id;
            while let Some(id) = next {
                if !seen.insert(id) {
                    break;
                }
                let group = self.accounts.group(id)?;
                keys.push(GroupKey::most(group.label()));
                next = group.parent_id;
            }
        } else {
            let mut code: String = account.code.chars().take(ACCOUNT_CODE_PREFIX_LEN).collect();
            while !code.is_empty() {
                keys.push(GroupKey::most(code.clone()));
                code.pop();
            }
        }

        keys.reverse();
        Ok(keys)
    }

    /// Files lines of ungrouped accounts into the tree. They share the
    /// no-group bucket, unless nothing else was grouped in this section, in
    /// which case each goes under its own code prefixes.
    fn file_no_group(
        &self,
        tree: &mut HierarchyNode,
        lines: Vec<ReportLine>,
        cache: &mut HashMap<AccountId, Account>,
    ) -> Result<(), ReportError> {
        if lines.is_empty() {
            return Ok(());
        }

        let by_code = tree.is_empty();
        let bucket = vec![GroupKey::least(self.config.no_group_label.clone())];
        let mut pending = HierarchyNode::default();

        for line in lines {
            let mut path = Vec::new();
            if by_code {
                if let Some(account_id) = line.grouping_account() {
                    path = self.account_path(&self.resolve(cache, account_id)?)?;
                }
            }
            if path.is_empty() {
                path.clone_from(&bucket);
            }
            let (section, depth) = (section_of(&line), depth_of(&line));
            pending.insert(section, &path, line, depth);
        }

        debug!(by_code, "filed ungrouped account lines");
        tree.merge(pending);
        Ok(())
    }

    /// Post-order walk producing header lines and their column sums.
    fn flatten(&self, node: HierarchyNode, scope: &FlattenScope<'_>) -> (Vec<CellValue>, Vec<ReportLine>) {
        let HierarchyNode {
            depth,
            parent_id,
            children,
            lines: own_lines,
        } = node;

        let mut sums: Vec<Vec<CellValue>> = own_lines.iter().map(ReportLine::raw_values).collect();
        let mut lines = own_lines;

        for (key, child) in children {
            let (child_sums, sub_lines) = self.flatten(child, scope);
            lines.push(self.header_line(&key, depth, parent_id.clone(), &child_sums, scope));
            lines.extend(sub_lines);
            sums.push(child_sums);
        }

        (merge_columns(&sums, scope.width), lines)
    }

    fn header_line(
        &self,
        key: &GroupKey,
        depth: Option<u32>,
        parent_id: Option<LineId>,
        sums: &[CellValue],
        scope: &FlattenScope<'_>,
    ) -> ReportLine {
        let id = key.header_id();
        let unfolded = scope.unfold_all || scope.options.is_unfolded(&id);
        let columns = sums
            .iter()
            .map(|value| match value {
                CellValue::Number(amount) => {
                    Column::number(*amount, self.formatter.format(*amount, false))
                }
                CellValue::Text(text) => Column::text(text.clone()),
            })
            .collect();

        let mut header = ReportLine::new(id, truncate(&key.label, self.config.group_label_max_len));
        header.title_hover = Some(key.label.clone());
        header.columns = columns;
        header.level = Some(depth.unwrap_or(1));
        header.parent_id = parent_id;
        header.unfoldable = true;
        header.unfolded = unfolded;
        if key.priority == SortPriority::Least {
            header.style = Some(ITALIC_STYLE.to_string());
        }
        header
    }
}

/// Section a line belongs to: its parent line, or the report root.
fn section_of(line: &ReportLine) -> LineId {
    line.parent_id.clone().unwrap_or_else(|| LineId::from("root"))
}

fn depth_of(line: &ReportLine) -> u32 {
    line.level.unwrap_or(0) + 1
}

/// Cuts `text` to `max` characters followed by an ellipsis when longer.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text.to_string()
    }
}
