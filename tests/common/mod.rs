//! Common test utilities for integration tests

use std::io::{Cursor, Read, Write};

/// Sample CSV payload of award records for testing (2 data rows)
#[allow(dead_code)]
pub const AWARDS_CSV: &str = "\
award_id_piid,total_obligation,awarding_agency_name\n\
47QSWA18D008F,152000.50,General Services Administration\n\
W912DY20F0017,98500.00,Department of Defense\n";

/// Builds an in-memory ZIP archive from (name, content) pairs
#[allow(dead_code)]
pub fn zip_fixture(files: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// Extracts a named member from ZIP bytes, for round-trip assertions
#[allow(dead_code)]
pub fn read_zip_member(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut member = archive.by_name(name).unwrap();
    let mut contents = Vec::new();
    member.read_to_end(&mut contents).unwrap();
    contents
}
