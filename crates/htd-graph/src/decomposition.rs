use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use htd_core::errors::{solution_error, ErrorInfo, HtdError};
use htd_core::token::{is_skippable, parse_int, tokenize, ParseMode};
use htd_core::{BagId, ConstraintGate, HyperedgeId, Strictness, VertexId};
use serde::{Deserialize, Serialize};

use crate::tree::DecompositionTree;

/// Decomposition family named by the second header token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecompositionKind {
    /// `htd`: also subject to the descendant condition.
    Hypertree,
    /// `ghtd`: tree, coverage, connectivity and edge function only.
    Generalized,
}

impl DecompositionKind {
    /// Returns the header token for this family.
    pub fn token(self) -> &'static str {
        match self {
            DecompositionKind::Hypertree => "htd",
            DecompositionKind::Generalized => "ghtd",
        }
    }

    /// Parses a header token; `td` and `fhtd` are not graded here.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "htd" => Some(DecompositionKind::Hypertree),
            "ghtd" => Some(DecompositionKind::Generalized),
            _ => None,
        }
    }

    /// Returns whether the descendant condition applies.
    pub fn requires_descendant_condition(self) -> bool {
        self == DecompositionKind::Hypertree
    }
}

/// Header record `s <kind> <numBags> <width> <numVertex> <numHyperEdge>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionHeader {
    /// Family selected by the second header token.
    pub kind: DecompositionKind,
    /// Declared number of bags.
    pub num_bags: usize,
    /// Declared width (maximum label-set size).
    pub width: usize,
    /// Number of instance vertices the decomposition refers to.
    pub num_vertices: usize,
    /// Number of instance hyperedges the decomposition refers to.
    pub num_hyperedges: usize,
}

/// Generalized hypertree decomposition: bags, label sets and a rooted tree.
///
/// A value of this type has passed its own well-formedness checks (or, for a
/// lenient parse, recorded the ones it failed in [`Decomposition::waived`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    header: DecompositionHeader,
    bags: Vec<BTreeSet<VertexId>>,
    labels: Vec<BTreeSet<HyperedgeId>>,
    tree: DecompositionTree,
    waived: Vec<ErrorInfo>,
}

impl Decomposition {
    /// Parses and self-validates a decomposition from a buffered reader.
    pub fn parse<R: BufRead>(reader: R, strictness: Strictness) -> Result<Self, HtdError> {
        let mut parser = DecompositionParser::new(strictness);
        for line in reader.lines() {
            let line = line.map_err(|err| HtdError::io(&err, "<decomposition>"))?;
            parser.feed(&line)?;
        }
        let decomposition = parser.finish()?;
        tracing::debug!(
            bags = decomposition.num_bags(),
            width = decomposition.width(),
            waived = decomposition.waived.len(),
            "parsed decomposition"
        );
        Ok(decomposition)
    }

    /// Parses a decomposition held in memory.
    pub fn parse_str(text: &str, strictness: Strictness) -> Result<Self, HtdError> {
        Self::parse(text.as_bytes(), strictness)
    }

    /// Reads and parses a decomposition file.
    pub fn from_path(path: impl AsRef<Path>, strictness: Strictness) -> Result<Self, HtdError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| HtdError::io(&err, path.display()))?;
        Self::parse(BufReader::new(file), strictness)
    }

    /// Returns the parsed header.
    pub fn header(&self) -> &DecompositionHeader {
        &self.header
    }

    /// Returns the decomposition family.
    pub fn kind(&self) -> DecompositionKind {
        self.header.kind
    }

    /// Returns the number of bags.
    pub fn num_bags(&self) -> usize {
        self.header.num_bags
    }

    /// Returns the declared width.
    pub fn width(&self) -> usize {
        self.header.width
    }

    /// Returns the largest label-set size actually present.
    pub fn computed_width(&self) -> usize {
        max_label_size(&self.labels)
    }

    /// Returns the vertex count declared in the header.
    pub fn num_vertices(&self) -> usize {
        self.header.num_vertices
    }

    /// Returns the hyperedge count declared in the header.
    pub fn num_hyperedges(&self) -> usize {
        self.header.num_hyperedges
    }

    /// Returns the vertex set of a bag.
    pub fn bag(&self, id: BagId) -> Option<&BTreeSet<VertexId>> {
        if id.as_raw() == 0 {
            return None;
        }
        self.bags.get(id.index())
    }

    /// Returns the label set (λ) of a bag.
    pub fn labels(&self, id: BagId) -> Option<&BTreeSet<HyperedgeId>> {
        if id.as_raw() == 0 {
            return None;
        }
        self.labels.get(id.index())
    }

    /// Iterates over `(bag, vertices, labels)` in bag order.
    pub fn bags(
        &self,
    ) -> impl Iterator<Item = (BagId, &BTreeSet<VertexId>, &BTreeSet<HyperedgeId>)> + '_ {
        self.bags
            .iter()
            .zip(self.labels.iter())
            .enumerate()
            .map(|(idx, (vertices, labels))| (BagId::from_index(idx), vertices, labels))
    }

    /// Returns the rooted decomposition tree.
    pub fn tree(&self) -> &DecompositionTree {
        &self.tree
    }

    /// Returns the violations waived by a lenient parse.
    pub fn waived(&self) -> &[ErrorInfo] {
        &self.waived
    }

    /// Writes the decomposition in canonical text form.
    ///
    /// Tree edges are emitted as `parent child` so re-parsing reproduces the
    /// same rooting whatever direction the input used.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let header = &self.header;
        writeln!(
            out,
            "s {} {} {} {} {}",
            header.kind.token(),
            header.num_bags, header.width, header.num_vertices, header.num_hyperedges
        )?;
        for (parent, child) in self.tree.parent_edges() {
            writeln!(out, "{parent} {child}")?;
        }
        for (bag, vertices, labels) in self.bags() {
            write!(out, "b {bag}")?;
            for vertex in vertices {
                write!(out, " {vertex}")?;
            }
            writeln!(out)?;
            for edge in labels {
                writeln!(out, "w {bag} {edge} 1")?;
            }
        }
        Ok(())
    }

    /// Renders the canonical text form into a string.
    pub fn to_text(&self) -> String {
        let mut buffer = Vec::new();
        let _ = self.write(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Streaming parser for the decomposition format.
#[derive(Debug)]
struct DecompositionParser {
    gate: ConstraintGate,
    header: Option<DecompositionHeader>,
    bags: BTreeMap<BagId, BTreeSet<VertexId>>,
    labels: BTreeMap<BagId, BTreeSet<HyperedgeId>>,
    edges: Vec<(BagId, BagId)>,
    records: usize,
}

impl DecompositionParser {
    fn new(strictness: Strictness) -> Self {
        Self {
            gate: ConstraintGate::new(strictness),
            header: None,
            bags: BTreeMap::new(),
            labels: BTreeMap::new(),
            edges: Vec::new(),
            records: 0,
        }
    }

    fn feed(&mut self, line: &str) -> Result<(), HtdError> {
        let tokens = tokenize(line);
        if is_skippable(&tokens) {
            return Ok(());
        }
        if tokens[0] == "s" {
            return self.header_record(&tokens);
        }
        let Some(header) = self.header else {
            self.gate.require(
                false,
                "record-before-header",
                "Other description before header found",
            )?;
            return Ok(());
        };
        self.records += 1;
        match tokens[0] {
            "b" => self.bag_record(&tokens, &header),
            "w" => self.width_record(&tokens, &header),
            _ => self.edge_record(&tokens, &header),
        }
    }

    // Header defects leave nothing to size the remaining records by, so they
    // abort under either policy; only a repeated header can be skipped.
    fn header_record(&mut self, tokens: &[&str]) -> Result<(), HtdError> {
        if !self.gate.require(
            self.header.is_none(),
            "duplicate-header",
            "Multiple header in solution",
        )? {
            return Ok(());
        }
        if tokens.len() != 6 {
            return Err(solution_error(
                "malformed-header",
                "Header must be 6 tokens <s htd numBags width numVertex numHyperEdge>",
            ));
        }
        let Some(kind) = DecompositionKind::from_token(tokens[1]) else {
            return Err(solution_error(
                "malformed-header",
                "Second header token must be htd or ghtd",
            ));
        };
        let mut values = [0usize; 4];
        for (slot, token) in values.iter_mut().zip(&tokens[2..]) {
            let value = parse_int(ParseMode::Solution, token, None)?;
            if value < 0 || value > i64::from(u32::MAX) {
                return Err(solution_error(
                    "malformed-header",
                    "Header values must lie in [0, 4294967295]",
                ));
            }
            *slot = value as usize;
        }
        let [num_bags, width, num_vertices, num_hyperedges] = values;
        if num_bags == 0 {
            return Err(solution_error(
                "malformed-header",
                "Header numBags must be positive",
            ));
        }
        self.header = Some(DecompositionHeader {
            kind,
            num_bags,
            width,
            num_vertices,
            num_hyperedges,
        });
        Ok(())
    }

    fn bag_record(
        &mut self,
        tokens: &[&str],
        header: &DecompositionHeader,
    ) -> Result<(), HtdError> {
        if !self.gate.require(
            tokens.len() > 2,
            "malformed-bag",
            "Bag description must have at least 3 tokens",
        )? {
            return Ok(());
        }
        let Some(idx) = self.int(tokens[1])? else {
            return Ok(());
        };
        if !self.gate.require(
            in_range(idx, header.num_bags),
            "bag-out-of-range",
            "Bag index out of range [1, numBags]",
        )? {
            return Ok(());
        }
        let id = BagId::from_raw(idx as u32);
        if !self.gate.require(
            !self.bags.contains_key(&id),
            "duplicate-bag",
            "Multiple bag index found",
        )? {
            return Ok(());
        }

        let mut seen = BTreeSet::new();
        for token in &tokens[2..] {
            let Some(vertex) = self.int(token)? else {
                return Ok(());
            };
            if !self.gate.require(
                seen.insert(vertex),
                "duplicate-vertex",
                "Multiple same vertex in a bag",
            )? {
                return Ok(());
            }
            if !self.gate.require(
                in_range(vertex, header.num_vertices),
                "vertex-out-of-range",
                "Vertex index out of range [1, numVertex]",
            )? {
                return Ok(());
            }
        }
        let vertices = seen
            .into_iter()
            .map(|vertex| VertexId::from_raw(vertex as u32))
            .collect();
        self.bags.insert(id, vertices);
        Ok(())
    }

    fn width_record(
        &mut self,
        tokens: &[&str],
        header: &DecompositionHeader,
    ) -> Result<(), HtdError> {
        if !self.gate.require(
            tokens.len() == 4,
            "malformed-width-function",
            "Width function specification must consists of 4 tokens",
        )? {
            return Ok(());
        }
        let (Some(bag), Some(edge), Some(value)) = (
            self.int(tokens[1])?,
            self.int(tokens[2])?,
            self.int(tokens[3])?,
        ) else {
            return Ok(());
        };
        let checks = [
            (
                in_range(bag, header.num_bags),
                "width-bag-out-of-range",
                "Width function bag Id out of range [1, numBags]",
            ),
            (
                in_range(edge, header.num_hyperedges),
                "width-edge-out-of-range",
                "Width function hyperedge Id out of range [1, numHyperEdge]",
            ),
            (
                value == 0 || value == 1,
                "width-value",
                "Width function value must be 0 or 1",
            ),
        ];
        for (holds, code, message) in checks {
            if !self.gate.require(holds, code, message)? {
                return Ok(());
            }
        }
        if value == 1 {
            self.labels
                .entry(BagId::from_raw(bag as u32))
                .or_default()
                .insert(HyperedgeId::from_raw(edge as u32));
        }
        Ok(())
    }

    fn edge_record(
        &mut self,
        tokens: &[&str],
        header: &DecompositionHeader,
    ) -> Result<(), HtdError> {
        if !self.gate.require(
            tokens.len() == 2,
            "malformed-tree-edge",
            "Hypertree edge must consists of 2 tokens",
        )? {
            return Ok(());
        }
        let (Some(u), Some(v)) = (self.int(tokens[0])?, self.int(tokens[1])?) else {
            return Ok(());
        };
        if !self.gate.require(
            in_range(u, header.num_bags),
            "tree-edge-out-of-range",
            "First hypertree vertex out of range [1, numBags]",
        )? || !self.gate.require(
            in_range(v, header.num_bags),
            "tree-edge-out-of-range",
            "Second hypertree vertex out of range [1, numBags]",
        )? {
            return Ok(());
        }
        self.edges
            .push((BagId::from_raw(u as u32), BagId::from_raw(v as u32)));
        Ok(())
    }

    /// Parses an integer token, returning `None` when a lenient gate waived
    /// the failure.
    fn int(&mut self, token: &str) -> Result<Option<i64>, HtdError> {
        match parse_int(ParseMode::Solution, token, None) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.gate.reject(err)?;
                Ok(None)
            }
        }
    }

    // Storage is sized from the records actually read. A header declaring
    // more bags than the file has records cannot be honoured even leniently.
    fn finish(self) -> Result<Decomposition, HtdError> {
        let Some(header) = self.header else {
            return Err(solution_error("missing-header", "No header found"));
        };
        let mut gate = self.gate;

        let found = self.bags.len();
        if found != header.num_bags {
            let info = ErrorInfo::new("bag-count-mismatch", "Number of bags differs with header")
                .with_context("declared", header.num_bags)
                .with_context("found", found);
            if header.num_bags > self.records {
                return Err(HtdError::Solution(info));
            }
            gate.require_with(false, || info)?;
        }
        let computed = self
            .labels
            .values()
            .map(BTreeSet::len)
            .max()
            .unwrap_or(0);
        gate.require_with(computed == header.width, || {
            ErrorInfo::new("width-mismatch", "Width differs with header")
                .with_context("declared", header.width)
                .with_context("computed", computed)
        })?;

        let mut bags = vec![BTreeSet::new(); header.num_bags];
        for (id, vertices) in self.bags {
            bags[id.index()] = vertices;
        }
        let mut labels = vec![BTreeSet::new(); header.num_bags];
        for (id, edges) in self.labels {
            labels[id.index()] = edges;
        }
        let mut tree = DecompositionTree::new(header.num_bags);
        for (u, v) in self.edges {
            tree.add_edge(u, v)?;
        }
        let selection = tree.make_rooted();
        gate.require_with(selection.is_unique(), || {
            ErrorInfo::new("ambiguous-root", "Hypertree has ambiguous or missing root")
                .with_context("candidates", selection.candidates.len())
        })?;
        gate.require(tree.is_valid_tree(), "invalid-tree", "Hypertree is not valid")?;

        let holders = vertex_holders(&bags);
        if holders.len() != header.num_vertices {
            let uncovered = (1..=holders.len() + 1)
                .map(|raw| VertexId::from_raw(raw as u32))
                .find(|vertex| !holders.contains_key(vertex));
            gate.require_with(false, || {
                ErrorInfo::new("vertex-not-covered", "There is vertex that is not in any bag")
                    .with_context("vertex", uncovered.map_or(0, |vertex| vertex.as_raw()))
            })?;
        }
        let disconnected = holders
            .iter()
            .find(|(_, bags)| !tree.is_connected_component(bags))
            .map(|(vertex, _)| *vertex);
        gate.require_with(disconnected.is_none(), || {
            ErrorInfo::new(
                "vertex-bags-disconnected",
                "There exists not connected vertex bags component",
            )
            .with_context("vertex", disconnected.map_or(0, |vertex| vertex.as_raw()))
        })?;

        Ok(Decomposition {
            header,
            bags,
            labels,
            tree,
            waived: gate.into_waived(),
        })
    }
}

/// Maps each vertex that occurs in some bag to its bags, in bag order.
fn vertex_holders(bags: &[BTreeSet<VertexId>]) -> BTreeMap<VertexId, Vec<BagId>> {
    let mut holders: BTreeMap<VertexId, Vec<BagId>> = BTreeMap::new();
    for (idx, vertices) in bags.iter().enumerate() {
        for vertex in vertices {
            holders.entry(*vertex).or_default().push(BagId::from_index(idx));
        }
    }
    holders
}

fn max_label_size(labels: &[BTreeSet<HyperedgeId>]) -> usize {
    labels.iter().map(BTreeSet::len).max().unwrap_or(0)
}

fn in_range(value: i64, upper: usize) -> bool {
    value >= 1 && value as u64 <= upper as u64
}
