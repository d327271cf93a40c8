//! Point groups and the series registry
//!
//! Raw input arrives as one of a closed set of numeric vector types
//! ([`NumericVec`]) and is widened to `f64` before it is stored. Multi
//! dimensional data is a fixed number of coordinate columns; the effective
//! length of a point group is the length of its shortest column.

use crate::error::{GnuplotError, GnuplotResult};
use crate::style::Style;

/// A vector of one of the supported numeric element types
#[derive(Debug, Clone, PartialEq)]
pub enum NumericVec {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl NumericVec {
    /// Element type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            NumericVec::I8(_) => "i8",
            NumericVec::I16(_) => "i16",
            NumericVec::I32(_) => "i32",
            NumericVec::I64(_) => "i64",
            NumericVec::F32(_) => "f32",
            NumericVec::F64(_) => "f64",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericVec::I8(v) => v.len(),
            NumericVec::I16(v) => v.len(),
            NumericVec::I32(v) => v.len(),
            NumericVec::I64(v) => v.len(),
            NumericVec::F32(v) => v.len(),
            NumericVec::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widen every element to `f64`
    ///
    /// `i64` values beyond 2^53 round to the nearest representable double.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            NumericVec::I8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            NumericVec::I16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            NumericVec::I32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            NumericVec::I64(v) => v.iter().map(|&x| x as f64).collect(),
            NumericVec::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            NumericVec::F64(v) => v.clone(),
        }
    }

    fn same_type(&self, other: &NumericVec) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Raw point group data as handed to `add`
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// A flat sequence of values (1-D)
    Flat(NumericVec),
    /// One column per coordinate (x, y[, z])
    Columns(Vec<NumericVec>),
}

impl SeriesData {
    /// Number of coordinate columns this data declares
    pub fn declared_dimensions(&self) -> usize {
        match self {
            SeriesData::Flat(_) => 1,
            SeriesData::Columns(columns) => columns.len(),
        }
    }

    /// Widen to `f64` and shape for a plot of `dimensions` coordinates
    pub fn normalize(&self, dimensions: usize) -> GnuplotResult<PointData> {
        let mismatch = || GnuplotError::InvalidDimension {
            expected: dimensions,
            actual: self.declared_dimensions(),
        };

        match self {
            SeriesData::Flat(values) => {
                if dimensions != 1 {
                    return Err(mismatch());
                }
                Ok(PointData::OneD(values.to_f64()))
            }
            SeriesData::Columns(columns) => {
                if columns.len() != dimensions {
                    return Err(mismatch());
                }
                if let Some(first) = columns.first() {
                    if let Some(odd) = columns.iter().find(|c| !c.same_type(first)) {
                        return Err(GnuplotError::UnsupportedType(format!(
                            "columns mix element types {} and {}",
                            first.type_name(),
                            odd.type_name()
                        )));
                    }
                }
                match columns.as_slice() {
                    [x] => Ok(PointData::OneD(x.to_f64())),
                    [x, y] => Ok(PointData::TwoD([x.to_f64(), y.to_f64()])),
                    [x, y, z] => Ok(PointData::ThreeD([x.to_f64(), y.to_f64(), z.to_f64()])),
                    _ => Err(mismatch()),
                }
            }
        }
    }
}

macro_rules! impl_series_data_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for NumericVec {
                fn from(values: Vec<$ty>) -> Self {
                    NumericVec::$variant(values)
                }
            }

            impl From<&[$ty]> for NumericVec {
                fn from(values: &[$ty]) -> Self {
                    NumericVec::$variant(values.to_vec())
                }
            }

            impl From<Vec<$ty>> for SeriesData {
                fn from(values: Vec<$ty>) -> Self {
                    SeriesData::Flat(values.into())
                }
            }

            impl From<&[$ty]> for SeriesData {
                fn from(values: &[$ty]) -> Self {
                    SeriesData::Flat(values.into())
                }
            }

            impl From<Vec<Vec<$ty>>> for SeriesData {
                fn from(columns: Vec<Vec<$ty>>) -> Self {
                    SeriesData::Columns(columns.into_iter().map(NumericVec::from).collect())
                }
            }

            impl<const N: usize> From<[Vec<$ty>; N]> for SeriesData {
                fn from(columns: [Vec<$ty>; N]) -> Self {
                    SeriesData::Columns(columns.into_iter().map(NumericVec::from).collect())
                }
            }
        )*
    };
}

impl_series_data_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

impl From<NumericVec> for SeriesData {
    fn from(values: NumericVec) -> Self {
        SeriesData::Flat(values)
    }
}

/// Point group data widened to `f64`, tagged by dimensionality
#[derive(Debug, Clone, PartialEq)]
pub enum PointData {
    OneD(Vec<f64>),
    TwoD([Vec<f64>; 2]),
    ThreeD([Vec<f64>; 3]),
}

impl PointData {
    pub fn dimensions(&self) -> usize {
        match self {
            PointData::OneD(_) => 1,
            PointData::TwoD(_) => 2,
            PointData::ThreeD(_) => 3,
        }
    }

    /// Effective number of points: the shortest column wins
    pub fn len(&self) -> usize {
        match self {
            PointData::OneD(values) => values.len(),
            PointData::TwoD(columns) => columns.iter().map(Vec::len).min().unwrap_or(0),
            PointData::ThreeD(columns) => columns.iter().map(Vec::len).min().unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate columns, one slice per dimension
    pub fn columns(&self) -> Vec<&[f64]> {
        match self {
            PointData::OneD(values) => vec![values.as_slice()],
            PointData::TwoD(columns) => columns.iter().map(Vec::as_slice).collect(),
            PointData::ThreeD(columns) => columns.iter().map(Vec::as_slice).collect(),
        }
    }

    /// One record per point, combining columns positionally
    pub fn records(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        let columns = self.columns();
        (0..self.len()).map(move |i| columns.iter().map(|c| c[i]).collect())
    }
}

/// A named, styled point group
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    style: Style,
    raw: SeriesData,
    points: PointData,
}

impl Series {
    /// Build a series for a plot of `dimensions` coordinates
    pub fn new(
        name: impl Into<String>,
        style: Style,
        raw: SeriesData,
        dimensions: usize,
    ) -> GnuplotResult<Self> {
        let points = raw.normalize(dimensions)?;
        Ok(Self {
            name: name.into(),
            style,
            raw,
            points,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn dimensions(&self) -> usize {
        self.points.dimensions()
    }

    /// The input exactly as it was added
    pub fn raw(&self) -> &SeriesData {
        &self.raw
    }

    /// The input widened to `f64`
    pub fn points(&self) -> &PointData {
        &self.points
    }
}

/// Registry of the point groups currently on the plot
///
/// Iteration follows insertion order, which is also the redraw order
/// during a replay.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    dimensions: usize,
    series: Vec<Series>,
}

impl SeriesStore {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            series: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Validate and normalize a new point group without registering it
    pub fn prepare(&self, name: &str, style: Style, data: SeriesData) -> GnuplotResult<Series> {
        if self.contains(name) {
            return Err(GnuplotError::DuplicateName {
                name: name.to_string(),
            });
        }
        Series::new(name, style, data, self.dimensions)
    }

    /// Register a prepared series at the end of the redraw order
    pub fn insert(&mut self, series: Series) -> GnuplotResult<()> {
        if self.contains(series.name()) {
            return Err(GnuplotError::DuplicateName {
                name: series.name().to_string(),
            });
        }
        if series.dimensions() != self.dimensions {
            return Err(GnuplotError::InvalidDimension {
                expected: self.dimensions,
                actual: series.dimensions(),
            });
        }
        self.series.push(series);
        Ok(())
    }

    /// Validate, normalize and register a point group
    pub fn add(&mut self, name: &str, style: Style, data: SeriesData) -> GnuplotResult<&Series> {
        let series = self.prepare(name, style, data)?;
        self.series.push(series);
        Ok(&self.series[self.series.len() - 1])
    }

    /// Remove a point group; absent names are not an error
    pub fn remove(&mut self, name: &str) -> Option<Series> {
        let pos = self.series.iter().position(|s| s.name == name)?;
        Some(self.series.remove(pos))
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn style(&self, name: &str) -> GnuplotResult<Style> {
        self.get(name)
            .map(Series::style)
            .ok_or_else(|| GnuplotError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn set_style(&mut self, name: &str, style: Style) -> GnuplotResult<()> {
        let series = self
            .series
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| GnuplotError::NotFound {
                name: name.to_string(),
            })?;
        series.style = style;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(Series::name).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}
