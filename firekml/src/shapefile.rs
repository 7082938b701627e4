//! ESRI shapefile output of fire perimeters.
//!
//! Writes the main (`.shp`), index (`.shx`) and attribute (`.dbf`)
//! files of a polygon shapefile.
//!
//! # References
//!
//! 1. [ESRI Shapefile Technical Description](https://www.esri.com/content/dam/esrisites/sitecore-archive/Files/Pdfs/library/whitepapers/pdfs/shapefile.pdf)
//! 1. [dBASE file format](https://www.dbase.com/Knowledgebase/INT/db7_file_fmt.htm)

use crate::{perimeter::perimeters, FireKmlError, Outcome};
use byteorder::{BigEndian as BE, LittleEndian as LE, WriteBytesExt};
use chrono::{Datelike, Local, NaiveDate};
use geo::{geometry::LineString, Winding};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use wrfout::{Dataset, Steps, WrfFile, C};

const FILE_CODE: i32 = 9994;
const VERSION: i32 = 1000;
const HEADER_LEN: usize = 100;

/// Shape type of an empty record.
const NULL_SHAPE: i32 = 0;

/// Shape type of every non-empty record.
pub const POLYGON: i32 = 5;

/// Width of the `TIME` attribute, an ISO-8601 timestamp.
const TIME_WIDTH: usize = 19;

/// One shape with its `TIME` attribute.
#[derive(Debug, Clone, PartialEq)]
struct Record {
    rings: Vec<LineString<C>>,
    time: String,
}

impl Record {
    fn n_points(&self) -> usize {
        self.rings.iter().map(|ring| ring.0.len()).sum()
    }

    /// Returns the size of the record contents in bytes.
    fn content_len(&self) -> usize {
        if self.rings.is_empty() {
            4
        } else {
            4 + 32 + 4 + 4 + 4 * self.rings.len() + 16 * self.n_points()
        }
    }
}

/// Accumulates polygon records and writes them as a shapefile.
#[derive(Debug, Clone)]
pub struct ShapefileWriter {
    records: Vec<Record>,

    /// Last update date stored in the `.dbf` header.
    date: NaiveDate,
}

impl Default for ShapefileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapefileWriter {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            date: Local::now().date_naive(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Adds one record with a part per ring.
    ///
    /// Rings are stored clockwise, which marks every one of them as
    /// an outer ring. An empty ring list is stored as a null shape.
    pub fn push(&mut self, rings: Vec<LineString<C>>, time: &str) {
        let rings = rings
            .into_iter()
            .map(|mut ring| {
                ring.make_cw_winding();
                ring
            })
            .collect();
        self.records.push(Record {
            rings,
            time: time.to_owned(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes `base.shp`, `base.shx` and `base.dbf`, returning their
    /// paths.
    pub fn write(&self, base: &Path) -> Result<Vec<PathBuf>, FireKmlError> {
        let paths: Vec<PathBuf> = ["shp", "shx", "dbf"]
            .iter()
            .map(|ext| base.with_extension(ext))
            .collect();
        let create = |path: &PathBuf| File::create(path).map(BufWriter::new);
        let mut shp = create(&paths[0])?;
        let mut shx = create(&paths[1])?;
        let mut dbf = create(&paths[2])?;
        self.write_to(&mut shp, &mut shx, &mut dbf)?;
        shp.flush()?;
        shx.flush()?;
        dbf.flush()?;
        Ok(paths)
    }

    /// Writes the three component files to the given writers.
    pub fn write_to<W: Write>(&self, shp: &mut W, shx: &mut W, dbf: &mut W) -> std::io::Result<()> {
        self.write_shp_shx(shp, shx)?;
        self.write_dbf(dbf)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn write_shp_shx<W: Write>(&self, shp: &mut W, shx: &mut W) -> std::io::Result<()> {
        let shp_len = HEADER_LEN
            + self
                .records
                .iter()
                .map(|record| 8 + record.content_len())
                .sum::<usize>();
        let shx_len = HEADER_LEN + 8 * self.records.len();
        let bbox = bounding_box(self.records.iter().flat_map(|record| record.rings.iter()));
        write_header(shp, shp_len, bbox)?;
        write_header(shx, shx_len, bbox)?;

        let mut offset = HEADER_LEN;
        for (i, record) in self.records.iter().enumerate() {
            let content_len = record.content_len();
            shx.write_i32::<BE>(words(offset))?;
            shx.write_i32::<BE>(words(content_len))?;

            shp.write_i32::<BE>(i as i32 + 1)?;
            shp.write_i32::<BE>(words(content_len))?;
            if record.rings.is_empty() {
                shp.write_i32::<LE>(NULL_SHAPE)?;
            } else {
                shp.write_i32::<LE>(POLYGON)?;
                write_bbox(shp, bounding_box(record.rings.iter()))?;
                shp.write_i32::<LE>(record.rings.len() as i32)?;
                shp.write_i32::<LE>(record.n_points() as i32)?;
                let mut start = 0;
                for ring in &record.rings {
                    shp.write_i32::<LE>(start as i32)?;
                    start += ring.0.len();
                }
                for coord in record.rings.iter().flat_map(LineString::coords) {
                    shp.write_f64::<LE>(coord.x)?;
                    shp.write_f64::<LE>(coord.y)?;
                }
            }
            offset += 8 + content_len;
        }
        Ok(())
    }

    /// Writes a dBASE III table with a single `TIME` character field.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn write_dbf<W: Write>(&self, dbf: &mut W) -> std::io::Result<()> {
        const N_FIELDS: usize = 1;
        let header_len = 32 + 32 * N_FIELDS + 1;
        let record_len = 1 + TIME_WIDTH;

        dbf.write_u8(0x03)?;
        dbf.write_u8((self.date.year() - 1900).clamp(0, 255) as u8)?;
        dbf.write_u8(self.date.month() as u8)?;
        dbf.write_u8(self.date.day() as u8)?;
        dbf.write_u32::<LE>(self.records.len() as u32)?;
        dbf.write_u16::<LE>(header_len as u16)?;
        dbf.write_u16::<LE>(record_len as u16)?;
        dbf.write_all(&[0; 20])?;

        let mut name = [0u8; 11];
        name[..4].copy_from_slice(b"TIME");
        dbf.write_all(&name)?;
        dbf.write_u8(b'C')?;
        dbf.write_all(&[0; 4])?;
        dbf.write_u8(TIME_WIDTH as u8)?;
        dbf.write_u8(0)?;
        dbf.write_all(&[0; 14])?;
        dbf.write_u8(0x0D)?;

        for record in &self.records {
            dbf.write_u8(b' ')?;
            let mut value = [b' '; TIME_WIDTH];
            let time = record.time.as_bytes();
            let n = time.len().min(TIME_WIDTH);
            value[..n].copy_from_slice(&time[..n]);
            dbf.write_all(&value)?;
        }
        dbf.write_u8(0x1A)
    }
}

/// (xmin, ymin, xmax, ymax) of every ring, zero if there are none.
fn bounding_box<'a>(rings: impl Iterator<Item = &'a LineString<C>>) -> [C; 4] {
    rings
        .flat_map(LineString::coords)
        .fold(None, |acc: Option<[C; 4]>, c| {
            Some(match acc {
                None => [c.x, c.y, c.x, c.y],
                Some([x0, y0, x1, y1]) => [x0.min(c.x), y0.min(c.y), x1.max(c.x), y1.max(c.y)],
            })
        })
        .unwrap_or([0.0; 4])
}

fn write_bbox<W: Write>(w: &mut W, bbox: [C; 4]) -> std::io::Result<()> {
    for v in bbox {
        w.write_f64::<LE>(v)?;
    }
    Ok(())
}

fn write_header<W: Write>(w: &mut W, len: usize, bbox: [C; 4]) -> std::io::Result<()> {
    w.write_i32::<BE>(FILE_CODE)?;
    for _ in 0..5 {
        w.write_i32::<BE>(0)?;
    }
    w.write_i32::<BE>(words(len))?;
    w.write_i32::<LE>(VERSION)?;
    w.write_i32::<LE>(POLYGON)?;
    write_bbox(w, bbox)?;
    // Z and M ranges.
    write_bbox(w, [0.0; 4])
}

/// Converts a byte count to 16-bit words.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn words(bytes: usize) -> i32 {
    (bytes / 2) as i32
}

/// Writes the fire perimeter at `steps` as a shapefile at `base`,
/// one record per ignited step.
///
/// A single unignited step writes nothing and returns
/// [`Outcome::NoData`].
pub fn write_perimeter_shapefile<D: Dataset>(
    file: &WrfFile<D>,
    steps: Steps,
    base: &Path,
) -> Result<Outcome, FireKmlError> {
    let perimeters = perimeters(file, steps)?;
    if steps.is_single() && perimeters.is_empty() {
        return Ok(Outcome::NoData);
    }
    let mut writer = ShapefileWriter::new();
    for perimeter in perimeters {
        writer.push(perimeter.rings, &file.times().label(perimeter.step));
    }
    let paths = writer.write(base)?;
    info!("wrote {} records to {:?}", writer.len(), paths[0]);
    Ok(Outcome::Written(paths))
}
