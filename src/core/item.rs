use crate::error::BatchError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

pub type ItemProcessorResult<W> = Result<W, BatchError>;

pub type ItemWriterResult = Result<(), BatchError>;

/// Retrieves input one item at a time.
pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

/// Turns a read item into the item handed to the writer.
pub trait ItemProcessor<R, W> {
    fn process(&self, item: &R) -> ItemProcessorResult<W>;
}

/// Receives processed items, all of them in a single call.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }
}
