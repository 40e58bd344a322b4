/// This module provides a console item writer that prints the roster report.
pub mod console;

/// This module provides a CSV item reader.
pub mod csv;
