/// One page of training records: `inputs[i]` is paired with `outputs[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub inputs: Vec<Vec<f64>>,
    pub outputs: Vec<Vec<f64>>,
}

impl Page {
    pub fn new(inputs: Vec<Vec<f64>>, outputs: Vec<Vec<f64>>) -> Page {
        Page { inputs, outputs }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Source of training data for paged training.
///
/// `read_page` is called exactly once per page index, in order, while the
/// data is ingested; it is never called again during the epochs. Returning
/// `None` signals that the source has run out of data.
pub trait PageReader {
    fn read_page(&mut self, page: usize, page_size: usize) -> Option<Page>;
}

impl<F> PageReader for F
where
    F: FnMut(usize, usize) -> Option<Page>,
{
    fn read_page(&mut self, page: usize, page_size: usize) -> Option<Page> {
        self(page, page_size)
    }
}

/// Pages over rows that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageReader {
    inputs: Vec<Vec<f64>>,
    outputs: Vec<Vec<f64>>,
}

impl MemoryPageReader {
    pub fn new(inputs: Vec<Vec<f64>>, outputs: Vec<Vec<f64>>) -> MemoryPageReader {
        MemoryPageReader { inputs, outputs }
    }

    /// Number of input records.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl PageReader for MemoryPageReader {
    fn read_page(&mut self, page: usize, page_size: usize) -> Option<Page> {
        let start = page.checked_mul(page_size)?;
        if start >= self.inputs.len() {
            return None;
        }
        let end = (start + page_size).min(self.inputs.len());
        let out_end = end.min(self.outputs.len());
        let outputs = self.outputs.get(start..out_end).unwrap_or_default().to_vec();
        Some(Page::new(self.inputs[start..end].to_vec(), outputs))
    }
}
