use super::*;

use crate::error::Result;
use std::{collections::HashMap, fs::File, io::BufRead, path::Path, str::FromStr};

pub type RayId = i64;

/// One row of the path table: where a ray was after hitting a boundary,
/// and the direction it left in (degrees, as written by the simulator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySample {
    pub ray_id: RayId,
    pub position: Point,
    pub angle: Float,
}

impl FromStr for RaySample {
    type Err = RowError;

    /// Parse a `ray_id, x, y, angle` row. Whitespace around fields is ignored.
    fn from_str(row: &str) -> core::result::Result<Self, Self::Err> {
        let fields: Vec<_> = row.split(',').map(str::trim).collect();

        let [ray_id, x, y, angle] = fields.as_slice() else {
            return Err(RowError::ColumnCount(fields.len()));
        };

        fn parse<T: FromStr>(
            column: &'static str,
            value: &str,
        ) -> core::result::Result<T, RowError> {
            value.parse().map_err(|_| RowError::InvalidValue {
                column,
                value: value.into(),
            })
        }

        Ok(Self {
            ray_id: parse("ray_id", ray_id)?,
            position: Point::new(parse("x", x)?, parse("y", y)?),
            angle: parse("angle", angle)?,
        })
    }
}

/// The samples of a single ray, in the order they appear in the table.
#[derive(Clone, Debug, PartialEq)]
pub struct RayPath {
    pub id: RayId,
    pub samples: Vec<RaySample>,
}

impl RayPath {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.samples.iter().map(|s| s.position)
    }
}

/// Path table rows grouped by ray id.
///
/// Groups are kept in the order their id first appears, rows within a group
/// keep their table order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayPaths {
    paths: Vec<RayPath>,
}

impl RayPaths {
    /// Read a headerless `ray_id, x, y, angle` table. Blank lines are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut samples = vec![];

        for (i, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let sample = line
                .parse::<RaySample>()
                .map_err(|source| Error::DataLoad { line: i + 1, source })?;

            samples.push(sample);
        }

        Ok(Self::from_iter(samples))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, RayPath> {
        self.paths.iter()
    }

    pub fn get(&self, id: RayId) -> Option<&RayPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RayId> + '_ {
        self.paths.iter().map(|p| p.id)
    }

    /// Total number of rows across all paths.
    pub fn sample_count(&self) -> usize {
        self.paths.iter().map(RayPath::len).sum()
    }
}

impl FromIterator<RaySample> for RayPaths {
    fn from_iter<I: IntoIterator<Item = RaySample>>(iter: I) -> Self {
        let mut paths: Vec<RayPath> = vec![];
        let mut index = HashMap::new();

        for sample in iter {
            let i = *index.entry(sample.ray_id).or_insert_with(|| {
                paths.push(RayPath {
                    id: sample.ray_id,
                    samples: vec![],
                });
                paths.len() - 1
            });

            paths[i].samples.push(sample);
        }

        Self { paths }
    }
}

impl<'a> IntoIterator for &'a RayPaths {
    type Item = &'a RayPath;
    type IntoIter = core::slice::Iter<'a, RayPath>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ray_id: RayId, x: Float, y: Float) -> RaySample {
        RaySample {
            ray_id,
            position: Point::new(x, y),
            angle: 0.,
        }
    }

    #[test]
    fn groups_keep_row_order() {
        let paths: RayPaths = [sample(1, 0., 0.), sample(2, 1., 1.), sample(1, 2., 2.)]
            .into_iter()
            .collect();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths.ids().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(
            paths.get(1).unwrap().points().collect::<Vec<_>>(),
            [Point::new(0., 0.), Point::new(2., 2.)]
        );
        assert_eq!(
            paths.get(2).unwrap().points().collect::<Vec<_>>(),
            [Point::new(1., 1.)]
        );
        assert_eq!(paths.sample_count(), 3);
    }

    #[test]
    fn groups_follow_first_appearance_not_id_value() {
        let paths: RayPaths = [sample(7, 0., 0.), sample(3, 0., 0.), sample(7, 1., 0.)]
            .into_iter()
            .collect();
        assert_eq!(paths.ids().collect::<Vec<_>>(), [7, 3]);
    }

    #[test]
    fn reads_simulator_output() {
        // the simulator writes `id, x, y, angle` and an empty line after each ray
        let table = "0, -10, 1, 0\n0, 5.5, 1, -2.75\n\n1, -10, 2, 0\n1, 5.5, 2, -5.5\n\n";

        let paths = RayPaths::from_reader(table.as_bytes()).unwrap();
        assert_eq!(paths.len(), 2);

        let first = paths.get(0).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.samples[1].position, Point::new(5.5, 1.));
        assert_eq!(first.samples[1].angle, -2.75);
    }

    #[test]
    fn wrong_column_count_reports_line() {
        let table = "0, 1, 2, 3\n\n1, 2, 3\n";

        let err = RayPaths::from_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::DataLoad {
                line: 3,
                source: RowError::ColumnCount(3)
            }
        ));
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = "1, x, 2, 3".parse::<RaySample>().unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidValue {
                column: "x",
                value: "x".into()
            }
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            RayPaths::load("definitely/not/here.csv"),
            Err(Error::Io(_))
        ));
    }
}
