//! Regex patterns for the incident summary table.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // One table row. Columns are separated by runs of two or more spaces,
    // so single spaces inside a location or nature stay in the field.
    pub static ref INCIDENT_ROW: Regex = Regex::new(
        r"(?x)
        ^(\d{1,2}/\d{1,2}/\d{4})   # date, e.g. 8/1/2024
        \s+
        (\d{1,2}:\d{2})            # time, e.g. 1:19
        \s{2,}
        (\d{4}-\d+)                # incident number, e.g. 2024-00055436
        \s{2,}
        (.+?)                      # location
        \s{2,}
        (.+?)                      # nature
        \s{2,}
        ([A-Z0-9]+)$               # ORI, e.g. OK0140200
        "
    ).unwrap();
}
