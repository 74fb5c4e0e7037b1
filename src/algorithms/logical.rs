// Partitioning through answer-set programming: emit a logic program that
// models the balanced min-cut problem, hand it to an external ASP solver and
// decode the best answer set it prints.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use log::debug;
use rustc_hash::FxHashMap;

use crate::algorithms::Error;
use crate::graph::Graph;
use crate::Partition;

// The program encodes vertices, edges and the part count as facts, guesses a
// part per vertex, minimizes the cut and forces all part sizes to be exactly
// equal. With a vertex count not divisible by the part count the program is
// unsatisfiable.
fn emit_program(graph: &Graph, part_count: usize, weighted: bool) -> String {
    let n = graph.len();
    let mut program = String::new();
    program.push_str(&format!("vertex(0..{}).\n", n - 1));
    for vertex in 0..n {
        for (neighbor, weight) in graph.neighbors(vertex) {
            if neighbor > vertex {
                if weighted {
                    program.push_str(&format!(
                        "edge({}, {}, {}).\n",
                        vertex, neighbor, weight as i64
                    ));
                } else {
                    program.push_str(&format!("edge({}, {}).\n", vertex, neighbor));
                }
            }
        }
    }
    program.push_str(&format!("k({part_count}).\n"));
    program.push_str("1 { part(V, 1..K) } :- vertex(V), k(K).\n");
    if weighted {
        program.push_str(
            "cut_edge(X,Y,W) :- edge(X,Y,W), part(X,P1), part(Y,P2), P1 != P2.\n",
        );
        program.push_str("#minimize { W,X,Y : cut_edge(X,Y,W) }.\n");
    } else {
        program.push_str("cut_edge(X,Y) :- edge(X,Y), part(X,P1), part(Y,P2), P1 != P2.\n");
        program.push_str("#minimize { 1,X,Y : cut_edge(X,Y) }.\n");
    }
    program.push_str("part_size(P,S) :- S = #count { V : part(V,P) }, k(K), P = 1..K.\n");
    program.push_str(
        ":- k(K), P1=1..K, P2=1..K, P1<P2, part_size(P1,S1), part_size(P2,S2), S1 != S2.\n",
    );
    program.push_str("#show part/2.\n");
    program
}

// Decode the final (best) answer of the solver's stdout. Solvers print a
// sequence of improving models as `Answer: <i>` headers each followed by a
// line of atoms.
fn parse_answer(stdout: &str, vertex_count: usize, part_count: usize) -> Result<Vec<usize>, Error> {
    if stdout.contains("UNSATISFIABLE") {
        return Err(Error::NoSolution);
    }

    let lines: Vec<&str> = stdout.lines().collect();
    let model = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with("Answer:"))
        .and_then(|position| lines.get(position + 1))
        .ok_or_else(|| {
            Error::SolverOutputMalformed("no Answer section in solver output".to_string())
        })?;

    let mut assignments: FxHashMap<usize, usize> = FxHashMap::default();
    for token in model.split_whitespace() {
        let atom = token
            .strip_prefix("part(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| {
                Error::SolverOutputMalformed(format!("unexpected atom {token:?}"))
            })?;
        let (vertex, part) = atom.split_once(',').ok_or_else(|| {
            Error::SolverOutputMalformed(format!("unexpected atom {token:?}"))
        })?;
        let vertex: usize = vertex.trim().parse().map_err(|_| {
            Error::SolverOutputMalformed(format!("bad vertex in {token:?}"))
        })?;
        let part: usize = part.trim().parse().map_err(|_| {
            Error::SolverOutputMalformed(format!("bad part in {token:?}"))
        })?;
        if vertex >= vertex_count || part == 0 || part > part_count {
            return Err(Error::SolverOutputMalformed(format!(
                "atom {token:?} out of range"
            )));
        }
        if assignments.insert(vertex, part - 1).is_some() {
            return Err(Error::SolverOutputMalformed(format!(
                "vertex {vertex} assigned twice"
            )));
        }
    }

    (0..vertex_count)
        .map(|vertex| {
            assignments.get(&vertex).copied().ok_or_else(|| {
                Error::SolverOutputMalformed(format!("vertex {vertex} missing from answer"))
            })
        })
        .collect()
}

/// Logical Programming Partitioner
///
/// Emits an answer-set program describing the balanced min-cut instance,
/// solves it with an external ASP solver (clingo by default) and decodes the
/// best answer. Part sizes are constrained to be exactly equal, so the vertex
/// count must be divisible by the part count.
#[derive(Debug, Clone)]
pub struct LogicalProgramming {
    /// Number of parts to produce.
    pub part_count: usize,

    /// Score cut edges by their integer-truncated weight instead of counting
    /// them.
    pub weighted: bool,

    /// The ASP solver binary to invoke.
    pub solver: PathBuf,

    /// Directory the emitted program file is written to. The file is removed
    /// when the call returns.
    pub workdir: PathBuf,
}

impl Default for LogicalProgramming {
    fn default() -> Self {
        LogicalProgramming {
            part_count: 2,
            weighted: false,
            solver: PathBuf::from("clingo"),
            workdir: std::env::temp_dir(),
        }
    }
}

impl<'a> Partition<&'a Graph> for LogicalProgramming {
    type Metadata = ();
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        graph: &'a Graph,
    ) -> Result<Self::Metadata, Self::Error> {
        if part_ids.len() != graph.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: graph.len(),
            });
        }
        if self.part_count == 0 || self.part_count > graph.len() {
            return Err(Error::InvalidPartCount {
                part_count: self.part_count,
                vertex_count: graph.len(),
            });
        }

        let program = emit_program(graph, self.part_count, self.weighted);
        let mut file = tempfile::Builder::new()
            .prefix("kwaycut-")
            .suffix(".lp")
            .tempfile_in(&self.workdir)
            .map_err(|error| Error::SolverUnavailable(error.to_string()))?;
        file.write_all(program.as_bytes())
            .map_err(|error| Error::SolverUnavailable(error.to_string()))?;

        debug!(
            "running ASP solver {} on {} vertices, k = {}",
            self.solver.display(),
            graph.len(),
            self.part_count
        );
        let output = Command::new(&self.solver)
            .arg(file.path())
            .output()
            .map_err(|error| Error::SolverUnavailable(error.to_string()))?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        let ids = parse_answer(&stdout, graph.len(), self.part_count)?;
        part_ids.copy_from_slice(&ids);
        Ok(())
    }
}
