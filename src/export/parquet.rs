use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::data::model::Spectrum;
use crate::error::Result;

/// Schema of the per-file Parquet output: list columns `x`/`y` plus labels.
pub fn schema() -> Arc<Schema> {
    let item = Arc::new(Field::new("item", DataType::Float64, true));
    Arc::new(Schema::new(vec![
        Field::new("x", DataType::List(item.clone()), false),
        Field::new("y", DataType::List(item), false),
        Field::new("name", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
    ]))
}

fn list_array<'a>(rows: impl Iterator<Item = &'a [f64]>) -> arrow::array::ListArray {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    builder.finish()
}

/// Build the record batch holding every spectrum of one CSV file.
pub fn to_record_batch(spectra: &[Spectrum]) -> Result<RecordBatch> {
    let x = list_array(spectra.iter().map(|s| s.x.as_slice()));
    let y = list_array(spectra.iter().map(|s| s.y.as_slice()));
    let names = StringArray::from_iter_values(spectra.iter().map(|s| s.name.as_str()));
    let sources = StringArray::from_iter_values(spectra.iter().map(|s| s.source.as_str()));

    let batch = RecordBatch::try_new(
        schema(),
        vec![Arc::new(x), Arc::new(y), Arc::new(names), Arc::new(sources)],
    )?;
    Ok(batch)
}

/// Write all spectra of one CSV file into a single Parquet file.
pub fn write_parquet(path: &Path, spectra: &[Spectrum]) -> Result<()> {
    let batch = to_record_batch(spectra)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::Float64Type;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn spectrum(name: &str, y: Vec<f64>) -> Spectrum {
        Spectrum {
            name: name.to_string(),
            source: "run".to_string(),
            x: (0..y.len()).map(|i| 350.0 + i as f64).collect(),
            y,
        }
    }

    #[test]
    fn round_trips_through_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.parquet");
        let spectra = vec![spectrum("A", vec![1.0, 2.0]), spectrum("B", vec![3.0, 4.0])];
        write_parquet(&path, &spectra).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 2);

        let names = batch.column(2).as_string::<i32>();
        assert_eq!(names.value(1), "B");

        let y = batch.column(1).as_list::<i32>();
        let second = y.value(1);
        let second = second.as_primitive::<Float64Type>();
        assert_eq!(second.len(), 2);
        assert_eq!(second.value(0), 3.0);
    }

    #[test]
    fn empty_file_has_no_rows() {
        let batch = to_record_batch(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
    }
}
