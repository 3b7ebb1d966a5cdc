use crate::utils::Result;

/// Reference region of a repeat, `contig:start-end` with a 0-based start and 1-based end.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let elements: Vec<&str> = encoding.trim().split(&[':', '-']).collect();

        if elements.len() != 3 {
            return Err(error_msg());
        }

        let start: u32 = elements[1].parse().map_err(|_| error_msg())?;
        let end: u32 = elements[2].parse().map_err(|_| error_msg())?;

        Self::new(elements[0].to_string(), start, end)
    }

    pub fn span(&self) -> u32 {
        self.end - self.start
    }

    /// Male callers emit a single allele on X, so any contig carrying an `X` is treated as chrX.
    pub fn is_chrx(&self) -> bool {
        self.contig.contains('X')
    }
}
