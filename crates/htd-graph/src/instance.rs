use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use htd_core::errors::{instance_error, HtdError};
use htd_core::token::{is_skippable, parse_int, tokenize, ParseMode};
use htd_core::{HyperedgeId, VertexId};

/// Hypergraph instance: vertex count plus indexed hyperedges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    num_vertices: usize,
    hyperedges: Vec<BTreeSet<VertexId>>,
}

impl Instance {
    /// Parses an instance from a buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, HtdError> {
        let mut parser = InstanceParser::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|err| HtdError::io(&err, "<instance>"))?;
            parser.feed(&line, idx + 1)?;
        }
        let instance = parser.finish()?;
        tracing::debug!(
            vertices = instance.num_vertices,
            hyperedges = instance.hyperedges.len(),
            "parsed hypergraph instance"
        );
        Ok(instance)
    }

    /// Parses an instance held in memory.
    pub fn parse_str(text: &str) -> Result<Self, HtdError> {
        Self::parse(text.as_bytes())
    }

    /// Reads and parses an instance file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HtdError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| HtdError::io(&err, path.display()))?;
        Self::parse(BufReader::new(file))
    }

    /// Returns the declared number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns the number of hyperedges.
    pub fn num_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Returns the vertex set of a hyperedge, if the id is in range.
    pub fn hyperedge(&self, id: HyperedgeId) -> Option<&BTreeSet<VertexId>> {
        if id.as_raw() == 0 {
            return None;
        }
        self.hyperedges.get(id.index())
    }

    /// Iterates over hyperedges in index order.
    pub fn hyperedges(&self) -> impl Iterator<Item = (HyperedgeId, &BTreeSet<VertexId>)> + '_ {
        self.hyperedges
            .iter()
            .enumerate()
            .map(|(idx, vertices)| (HyperedgeId::from_index(idx), vertices))
    }

    /// Writes the instance in its canonical text form.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "p htd {} {}", self.num_vertices, self.hyperedges.len())?;
        for (id, vertices) in self.hyperedges() {
            write!(out, "{id}")?;
            for vertex in vertices {
                write!(out, " {vertex}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Renders the canonical text form into a string.
    pub fn to_text(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[derive(Debug, Default)]
struct InstanceParser {
    header: Option<(usize, usize)>,
    hyperedges: BTreeMap<usize, BTreeSet<VertexId>>,
}

impl InstanceParser {
    fn feed(&mut self, line: &str, line_no: usize) -> Result<(), HtdError> {
        let tokens = tokenize(line);
        if is_skippable(&tokens) {
            return Ok(());
        }
        if tokens[0] == "p" {
            return self.header(&tokens, line_no);
        }
        let Some((num_vertices, num_hyperedges)) = self.header else {
            return Err(fail(
                "edge-before-header",
                "Hyperedge specification before header",
                line_no,
            ));
        };
        ensure(
            tokens.len() > 1,
            "empty-hyperedge",
            "Hyperedge must consist of at least one vertex",
            line_no,
        )?;

        let edge = parse_int(ParseMode::Instance, tokens[0], Some(line_no))?;
        ensure(
            in_range(edge, num_hyperedges),
            "edge-out-of-range",
            "Edge index out of range [1, numHyperEdge]",
            line_no,
        )?;
        let slot = edge as usize - 1;
        ensure(
            !self.hyperedges.contains_key(&slot),
            "duplicate-edge",
            "Multiple edge with same index",
            line_no,
        )?;

        let mut vertices = BTreeSet::new();
        for token in &tokens[1..] {
            let vertex = parse_int(ParseMode::Instance, token, Some(line_no))?;
            ensure(
                in_range(vertex, num_vertices),
                "vertex-out-of-range",
                "Vertex out of range [1, numVertex]",
                line_no,
            )?;
            ensure(
                vertices.insert(VertexId::from_raw(vertex as u32)),
                "duplicate-vertex",
                "Hyperedge contains multiple vertex with same number",
                line_no,
            )?;
        }
        self.hyperedges.insert(slot, vertices);
        Ok(())
    }

    fn header(&mut self, tokens: &[&str], line_no: usize) -> Result<(), HtdError> {
        ensure(
            self.header.is_none(),
            "duplicate-header",
            "Multiple header",
            line_no,
        )?;
        ensure(
            tokens.len() == 4,
            "malformed-header",
            "Header not consisting of 4 tokens <p htd numVertex numEdge>",
            line_no,
        )?;
        ensure(
            tokens[1] == "htd" || tokens[1] == "htw",
            "malformed-header",
            "Second header token must be \"htd\"",
            line_no,
        )?;
        let num_vertices = parse_int(ParseMode::Instance, tokens[2], Some(line_no))?;
        let num_hyperedges = parse_int(ParseMode::Instance, tokens[3], Some(line_no))?;
        ensure(
            num_vertices > 0,
            "malformed-header",
            "numVertex must be positive",
            line_no,
        )?;
        ensure(
            num_hyperedges > 0,
            "malformed-header",
            "numHyperEdge must be positive",
            line_no,
        )?;
        ensure(
            num_vertices <= i64::from(u32::MAX) && num_hyperedges <= i64::from(u32::MAX),
            "malformed-header",
            "Header count exceeds supported range",
            line_no,
        )?;
        self.header = Some((num_vertices as usize, num_hyperedges as usize));
        Ok(())
    }

    fn finish(self) -> Result<Instance, HtdError> {
        let Some((num_vertices, num_hyperedges)) = self.header else {
            return Err(instance_error("missing-header", "No header found", None));
        };
        // Indices are range checked and unique, so a full count means the
        // slots are exactly 0..num_hyperedges.
        if self.hyperedges.len() != num_hyperedges {
            return Err(instance_error(
                "edge-count-mismatch",
                "Hyperedge number differs from actual",
                None,
            ));
        }
        Ok(Instance {
            num_vertices,
            hyperedges: self.hyperedges.into_values().collect(),
        })
    }
}

fn in_range(value: i64, upper: usize) -> bool {
    value >= 1 && value as u64 <= upper as u64
}

fn ensure(holds: bool, code: &str, message: &str, line_no: usize) -> Result<(), HtdError> {
    if holds {
        Ok(())
    } else {
        Err(fail(code, message, line_no))
    }
}

fn fail(code: &str, message: &str, line_no: usize) -> HtdError {
    instance_error(code, message, Some(line_no))
}
