//! Console rendering of contact records.

use phonebook_core::{Contact, ContactId};
use std::io::{self, Write};

const RULE_WIDTH: usize = 30;
const UNKNOWN_DOB: &str = "not specified";

/// Writes a titled block of records, one per rule-separated section.
pub fn write_records<W: Write>(
    out: &mut W,
    title: &str,
    records: &[(ContactId, Contact)],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    write_rule(out)?;
    for (id, contact) in records {
        write_record(out, id, contact)?;
        write_rule(out)?;
    }
    Ok(())
}

/// Writes the four labeled fields of one record.
pub fn write_record<W: Write>(out: &mut W, id: &ContactId, contact: &Contact) -> io::Result<()> {
    writeln!(out, "Name: {}", id.name())?;
    writeln!(out, "Surname: {}", id.surname())?;
    writeln!(out, "Phone: {}", contact.phone)?;
    match contact.dob {
        Some(dob) => writeln!(out, "Date of birth: {dob}"),
        None => writeln!(out, "Date of birth: {UNKNOWN_DOB}"),
    }
}

fn write_rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}
