use super::{ClassicTable, DenseMatrix};

const HEADER_MARK: &str = "#OTU ID";

impl ClassicTable {
    /// Renders the table as classic text: a `#OTU ID` header, then one
    /// tab-separated line per observation, each ending in `\n`.
    pub fn to_classic_string(&self) -> String {
        let mut out = String::new();
        out.push_str(HEADER_MARK);
        for sample in &self.sample_ids {
            out.push('\t');
            out.push_str(sample);
        }
        if let Some(name) = &self.metadata_name {
            out.push('\t');
            out.push_str(name);
        }
        out.push('\n');

        let mut int_buf = itoa::Buffer::new();
        let mut float_buf = ryu::Buffer::new();
        for (row, id) in self.observation_ids.iter().enumerate() {
            out.push_str(id);
            match &self.data {
                DenseMatrix::Int(rows) => {
                    for &value in rows.get(row).into_iter().flatten() {
                        out.push('\t');
                        out.push_str(int_buf.format(value));
                    }
                }
                DenseMatrix::Float(rows) => {
                    for &value in rows.get(row).into_iter().flatten() {
                        out.push('\t');
                        out.push_str(float_buf.format(value));
                    }
                }
            }
            if let Some(metadata) = self.metadata.get(row).filter(|_| self.has_metadata()) {
                out.push('\t');
                out.push_str(metadata);
            }
            out.push('\n');
        }
        out
    }
}
