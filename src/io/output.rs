//! To describe dump of walks

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use anyhow::anyhow;
use csv::WriterBuilder;
use indexmap::IndexSet;

use crate::graph::NodeId;

/// Describes where and how walks are dumped.
pub struct Output {
    /// do we write node names (true) or node ids
    indexation: bool,
    /// field delimiter
    delimiter: u8,
    /// name of output file
    output_name: String,
}

impl Output {
    /// if output_name is None, default output_name will be "walks.csv"
    pub fn new(indexation: bool, delimiter: u8, output_name: &Option<String>) -> Self {
        let output_name = match output_name {
            Some(name) => name.clone(),
            None => String::from("walks.csv"),
        };
        Output {
            indexation,
            delimiter,
            output_name,
        }
    }

    /// get output_name
    pub fn get_output_name(&self) -> &String {
        &self.output_name
    }

    /// get indexation
    pub fn get_indexation(&self) -> bool {
        self.indexation
    }

    ///
    pub fn get_delimiter(&self) -> u8 {
        self.delimiter
    }

    /// dumps walks, mapping ids to names if indexation is asked for and node_indexation is given
    pub fn dump(&self, walks: &[Vec<NodeId>], node_indexation: Option<&IndexSet<String>>) -> anyhow::Result<()> {
        let nodes = if self.indexation { node_indexation } else { None };
        dump_walks_csv(walks, nodes, Path::new(&self.output_name), self.delimiter)
    }
} // end of Output

impl Default for Output {
    fn default() -> Self {
        Output {
            indexation: true,
            delimiter: b',',
            output_name: String::from("walks.csv"),
        }
    }
}

/// Writes one walk per line. Nodes are written by name if node_indexation is given, by id otherwise.
pub fn dump_walks_csv(
    walks: &[Vec<NodeId>],
    node_indexation: Option<&IndexSet<String>>,
    filepath: &Path,
    delimiter: u8,
) -> anyhow::Result<()> {
    let fileres = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(filepath);
    if fileres.is_err() {
        log::error!("dump_walks_csv could not open file {:?}", filepath.as_os_str());
        return Err(anyhow!("dump_walks_csv could not open file {}", filepath.display()));
    }
    let bufwriter = BufWriter::new(fileres?);
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_writer(bufwriter);
    for walk in walks {
        let record = walk
            .iter()
            .map(|node| match node_indexation {
                Some(nodes) => nodes
                    .get_index(*node)
                    .cloned()
                    .ok_or_else(|| anyhow!("node {} has no name in indexation", node)),
                None => Ok(node.to_string()),
            })
            .collect::<anyhow::Result<Vec<String>>>()?;
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    log::info!("dumped {} walks in {:?}", walks.len(), filepath);
    Ok(())
} // end of dump_walks_csv

// end of mod tests
