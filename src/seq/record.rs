// A record for one pasted sequence: the full header line (marker included) and the concatenated
// body lines. The header doubles as the key under which results are joined back.

#[derive(Debug, Clone, PartialEq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(header: impl Into<String>) -> Self {
        SeqRecord {
            header: header.into(),
            sequence: String::new(),
        }
    }
}
