use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::model::{LoadOptions, RawTable};
use crate::registry::TableReader;

use super::common::{normalize_headers, StringColumns};

pub struct CsvTableReader;

impl CsvTableReader {
    const NAME: &'static str = "CSV";
}

impl TableReader for CsvTableReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn read(&self, bytes: &[u8], options: &LoadOptions) -> Result<RawTable, ParserError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let header_record = reader
            .headers()
            .map_err(|source| ParserError::Csv {
                reader: Self::NAME,
                source,
            })?
            .clone();
        let headers = normalize_headers(Self::NAME, header_record.iter())?;

        let mut columns = StringColumns::new(headers);
        for result in reader.records() {
            let record = result.map_err(|source| ParserError::Csv {
                reader: Self::NAME,
                source,
            })?;
            columns.push_row(record.iter().map(|field| Some(field.to_string())));
        }

        columns.build(Self::NAME)
    }
}
