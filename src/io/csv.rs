//! Construct a typed graph from an edge list csv file.
//!
//! Each record is `src dst [weight [edge_type]]`. Node names are arbitrary strings, they get dense ids
//! in order of first appearance, the returned [IndexSet] maps ids back to names.
//! Lines beginning with # or % are skipped. Edges given twice (in an undirected file both directions
//! are often listed) are counted and kept once.
//!
//! An optional node type file has records `node type`, nodes absent from the edge list are ignored.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::BufReader;
use std::path::Path;

use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexSet;

use crate::graph::{NodeId, TypedGraph, TypedGraphBuilder, WeightT};

struct EdgeRecord {
    src: NodeId,
    dst: NodeId,
    weight: Option<WeightT>,
    edge_type: Option<String>,
}

fn open_records(filepath: &Path, delimiter: u8) -> anyhow::Result<csv::Reader<BufReader<std::fs::File>>> {
    let fileres = OpenOptions::new().read(true).open(filepath);
    if fileres.is_err() {
        log::error!("could not open file {:?}", filepath.as_os_str());
        return Err(anyhow!("could not open file {}", filepath.display()));
    }
    let bufreader = BufReader::new(fileres?);
    let rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(bufreader);
    Ok(rdr)
} // end of open_records

// non empty fields of a record, None for a comment line.
// repeated blank delimiters give empty fields, they are dropped
fn get_fields(record: &StringRecord) -> Option<Vec<&str>> {
    let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
    match fields.first() {
        None => None,
        Some(f) if f.starts_with('%') || f.starts_with('#') => None,
        Some(_) => Some(fields),
    }
}

/// Reads an edge list and an optional node type file.
///
/// Returns the graph and the node indexation: node id i has name `indexation.get_index(i)`.
pub fn csv_to_typed_graph(
    filepath: &Path,
    directed: bool,
    delimiter: u8,
    node_types_path: Option<&Path>,
) -> anyhow::Result<(TypedGraph, IndexSet<String>)> {
    log::debug!("csv_to_typed_graph reading {:?}, directed : {}", filepath, directed);
    let mut rdr = open_records(filepath, delimiter)?;
    let mut nodeset = IndexSet::<String>::new();
    let mut seen = HashSet::<(NodeId, NodeId), ahash::RandomState>::default();
    let mut edges = Vec::<EdgeRecord>::new();
    let mut nb_record = 0;
    let mut nb_double = 0;
    //
    for result in rdr.records() {
        let record = result?;
        nb_record += 1;
        let fields = match get_fields(&record) {
            Some(fields) => fields,
            None => continue,
        };
        if fields.len() < 2 || fields.len() > 4 {
            log::error!("record {} has {} fields, expecting 2 to 4", nb_record, fields.len());
            return Err(anyhow!(
                "record {} has {} fields, expecting src dst [weight [edge_type]]",
                nb_record,
                fields.len()
            ));
        }
        let (src, _) = nodeset.insert_full(fields[0].to_string());
        let (dst, _) = nodeset.insert_full(fields[1].to_string());
        let weight = match fields.get(2) {
            Some(field) => match field.parse::<WeightT>() {
                Ok(w) => Some(w),
                Err(_) => {
                    return Err(anyhow!("error decoding weight field of record {}", nb_record));
                }
            },
            None => None,
        };
        let key = if directed { (src, dst) } else { (src.min(dst), src.max(dst)) };
        if !seen.insert(key) {
            nb_double += 1;
            continue;
        }
        edges.push(EdgeRecord {
            src,
            dst,
            weight,
            edge_type: fields.get(3).map(|t| t.to_string()),
        });
    } // end of reading records
    log::info!(
        "read {} records, nb nodes : {}, nb edges : {}, nb edges given twice : {}",
        nb_record,
        nodeset.len(),
        edges.len(),
        nb_double
    );
    //
    let mut builder = TypedGraphBuilder::new(nodeset.len(), directed);
    for edge in &edges {
        builder.add_edge(edge.src, edge.dst, edge.weight, edge.edge_type.as_deref())?;
    }
    if let Some(path) = node_types_path {
        read_node_types(path, delimiter, &nodeset, &mut builder)?;
    }
    let graph = builder.build()?;
    Ok((graph, nodeset))
} // end of csv_to_typed_graph

fn read_node_types(
    filepath: &Path,
    delimiter: u8,
    nodeset: &IndexSet<String>,
    builder: &mut TypedGraphBuilder,
) -> anyhow::Result<()> {
    let mut rdr = open_records(filepath, delimiter)?;
    let mut nb_record = 0;
    let mut nb_unknown = 0;
    for result in rdr.records() {
        let record = result?;
        nb_record += 1;
        let fields = match get_fields(&record) {
            Some(fields) => fields,
            None => continue,
        };
        if fields.len() != 2 {
            return Err(anyhow!(
                "node type record {} has {} fields, expecting node type",
                nb_record,
                fields.len()
            ));
        }
        match nodeset.get_index_of(fields[0]) {
            Some(node) => builder.set_node_type(node, Some(fields[1]))?,
            None => nb_unknown += 1,
        }
    }
    if nb_unknown > 0 {
        log::warn!("{} typed nodes are not in the edge list", nb_unknown);
    }
    Ok(())
} // end of read_node_types

// end of mod tests
