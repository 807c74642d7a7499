//! Report emission: CSV record and human-readable summary.
//!
//! The CSV column order is a compatibility contract with downstream
//! consumers. New counters are appended, never inserted.

use super::aggregator::FeatureSnapshot;
use crate::core::error::FeatureResult;
use std::fmt;
use std::fs;
use std::path::Path;

/// CSV header, without trailing newline.
pub const CSV_HEADER: &str = "functions,bbs,binOps,bitBinOps,vecOps,aggOps,loadOps,storeOps,otherOps,totalOps,gMemAcc,lMemAcc,pMemAcc,floatingPointOps";

/// Values in header order.
pub fn csv_values(snapshot: &FeatureSnapshot) -> [u64; 14] {
    [
        snapshot.functions,
        snapshot.basic_blocks,
        snapshot.binary_ops,
        snapshot.bitwise_ops,
        snapshot.vector_ops,
        snapshot.aggregate_ops,
        snapshot.load_ops,
        snapshot.store_ops,
        snapshot.other_ops,
        snapshot.total_ops(),
        snapshot.global_mem_accesses,
        snapshot.local_mem_accesses,
        snapshot.private_mem_accesses,
        snapshot.total_float_ops(),
    ]
}

/// The data row, without trailing newline.
pub fn csv_row(snapshot: &FeatureSnapshot) -> String {
    csv_values(snapshot)
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line plus data row.
pub fn to_csv(snapshot: &FeatureSnapshot) -> String {
    format!("{}\n{}\n", CSV_HEADER, csv_row(snapshot))
}

/// Write the CSV record to `path`, replacing any previous content.
pub fn write_csv(path: &Path, snapshot: &FeatureSnapshot) -> FeatureResult<()> {
    log::info!("Writing to file: {}", path.display());
    fs::write(path, to_csv(snapshot))?;
    Ok(())
}

/// Labeled multi-line dump of a snapshot, for people rather than parsers.
pub struct Summary<'a>(pub &'a FeatureSnapshot);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f)?;
        writeln!(f, "###############################")?;
        writeln!(f, "#Functions: {}", s.functions)?;
        writeln!(f, "#Basic Blocks: {}", s.basic_blocks)?;
        writeln!(f, "#Floating point additions: {}", s.float_adds)?;
        writeln!(f, "#Floating point subtractions: {}", s.float_subs)?;
        writeln!(f, "#Floating point divisions: {}", s.float_divs)?;
        writeln!(f, "#Floating point multiplications: {}", s.float_muls)?;
        writeln!(f, "#Floating point Modulus: {}", s.float_rems)?;
        writeln!(f)?;
        writeln!(f, "#Bin Ops: {}", s.binary_ops)?;
        writeln!(f, "#Bit Bin Ops: {}", s.bitwise_ops)?;
        writeln!(f, "#Vec Ops: {}", s.vector_ops)?;
        writeln!(f, "#Agg Ops: {}", s.aggregate_ops)?;
        writeln!(f, "#Load Ops: {}", s.load_ops)?;
        writeln!(f, "#Store Ops: {}", s.store_ops)?;
        writeln!(f, "#Other Ops: {}", s.other_ops)?;
        writeln!(f)?;
        writeln!(f, "#Global Mem Access: {}", s.global_mem_accesses)?;
        writeln!(f, "#Local Mem Access: {}", s.local_mem_accesses)?;
        writeln!(f, "#Private Mem Access: {}", s.private_mem_accesses)?;
        writeln!(f, "#Unrecognized Address Spaces: {}", s.unrecognized_address_spaces)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "#Floating Point Ops: {}", s.total_float_ops())?;
        write!(f, "#Total Ops: {}", s.total_ops())
    }
}

/// Human-readable summary as a string.
pub fn summary(snapshot: &FeatureSnapshot) -> String {
    Summary(snapshot).to_string()
}
