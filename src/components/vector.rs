use geo_traits::{
    CoordTrait, GeometryTrait, GeometryType as TraitGeometryType, LineStringTrait, PointTrait,
    PolygonTrait,
};
use log::{debug, info, warn};
use ndarray::{Array2, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Geometry kind of a feature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Unknown,
}

impl GeometryType {
    /// OGC well-known-binary type code, `0` for [GeometryType::Unknown].
    pub fn wkb_code(&self) -> u32 {
        match self {
            GeometryType::Unknown => 0,
            GeometryType::Point => 1,
            GeometryType::LineString => 2,
            GeometryType::Polygon => 3,
            GeometryType::MultiPoint => 4,
            GeometryType::MultiLineString => 5,
            GeometryType::MultiPolygon => 6,
        }
    }

    /// Whether features of this kind carry coordinates in their record.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            GeometryType::Point | GeometryType::LineString | GeometryType::Polygon
        )
    }
}

/// One feature as the layer hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature<G> {
    pub fid: Option<u64>,
    /// `None` when the feature has no geometry or it could not be decoded.
    pub geometry: Option<G>,
}

/// An opened vector layer.
pub trait FeatureSource {
    type Geometry: GeometryTrait<T = f64>;

    fn feature_count(&mut self) -> u64;
    /// Rewinds the layer and yields every feature once, in layer order.
    fn features(&mut self) -> impl Iterator<Item = Result<SourceFeature<Self::Geometry>>> + '_;
}

/// One feature as handed to the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<u64>,
    /// `n x 2` rows of `(x, y)`; `0 x 0` for unsupported kinds.
    pub geometry: Array2<f64>,
    pub geometry_type: GeometryType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VectorLayer {
    pub features: Vec<FeatureRecord>,
}

impl VectorLayer {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Pulls every feature of `source` into records, in layer order.
pub fn extract_features<S: FeatureSource>(source: &mut S) -> Result<VectorLayer> {
    let expected = source.feature_count();
    let features = source
        .features()
        .enumerate()
        .map(|(index, feature)| feature.map(|feature| feature_record(index, feature)))
        .collect::<Result<Vec<_>>>()?;

    if features.len() as u64 != expected {
        warn!("layer announced {expected} features, read {}", features.len());
    }
    info!("read {} features", features.len());
    Ok(VectorLayer { features })
}

fn feature_record<G: GeometryTrait<T = f64>>(
    index: usize,
    feature: SourceFeature<G>,
) -> FeatureRecord {
    let (geometry_type, geometry) = match &feature.geometry {
        Some(geometry) => {
            let (geometry_type, grid) = geometry_grid(geometry);
            if !geometry_type.is_supported() {
                warn!("feature {index}: {geometry_type:?} geometry is not flattened");
            }
            (geometry_type, grid)
        }
        None => {
            warn!("feature {index} has no usable geometry");
            (GeometryType::Unknown, unsupported())
        }
    };
    debug!("feature {index}: {geometry_type:?} with {} points", geometry.nrows());
    FeatureRecord {
        fid: feature.fid,
        geometry,
        geometry_type,
    }
}

/// Flattens `geometry` into `(x, y)` rows.
///
/// Polygons keep their exterior ring only; holes are dropped.
/// Multi-geometries are not flattened and come back empty.
pub fn geometry_grid<G: GeometryTrait<T = f64>>(geometry: &G) -> (GeometryType, Array2<f64>) {
    match geometry.as_type() {
        TraitGeometryType::Point(point) => {
            (GeometryType::Point, coords_grid(point.coord().into_iter()))
        }
        TraitGeometryType::LineString(line) => {
            (GeometryType::LineString, coords_grid(line.coords()))
        }
        TraitGeometryType::Polygon(polygon) => (
            GeometryType::Polygon,
            polygon
                .exterior()
                .map(|ring| coords_grid(ring.coords()))
                .unwrap_or_else(|| Array2::zeros((0, 2))),
        ),
        TraitGeometryType::MultiPoint(_) => (GeometryType::MultiPoint, unsupported()),
        TraitGeometryType::MultiLineString(_) => (GeometryType::MultiLineString, unsupported()),
        TraitGeometryType::MultiPolygon(_) => (GeometryType::MultiPolygon, unsupported()),
        TraitGeometryType::GeometryCollection(_)
        | TraitGeometryType::Rect(_)
        | TraitGeometryType::Triangle(_)
        | TraitGeometryType::Line(_) => (GeometryType::Unknown, unsupported()),
    }
}

fn coords_grid<C: CoordTrait<T = f64>>(coords: impl Iterator<Item = C>) -> Array2<f64> {
    let coords: Vec<(f64, f64)> = coords.map(|coord| coord.x_y()).collect();
    Array2::from_shape_fn((coords.len(), 2).f(), |(row, axis)| {
        let (x, y) = coords[row];
        if axis == 0 {
            x
        } else {
            y
        }
    })
}

fn unsupported() -> Array2<f64> {
    Array2::zeros((0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{components::backends::memory::MemoryLayer, errors::MarshalError};
    use geo::{
        line_string, point, polygon, Geometry, GeometryCollection, MultiLineString, MultiPoint,
        MultiPolygon,
    };
    use ndarray::array;
    use rstest::rstest;

    #[test]
    fn point_is_one_row() {
        let (kind, grid) = geometry_grid(&Geometry::from(point!(x: 3., y: 4.)));
        assert_eq!(kind, GeometryType::Point);
        assert_eq!(grid, array![[3., 4.]]);
    }

    #[test]
    fn line_keeps_vertex_order() {
        let line = line_string![(x: 0., y: 0.), (x: 1., y: 2.), (x: 5., y: -1.)];
        let (kind, grid) = geometry_grid(&Geometry::from(line));
        assert_eq!(kind, GeometryType::LineString);
        assert_eq!(grid, array![[0., 0.], [1., 2.], [5., -1.]]);
    }

    #[test]
    fn polygon_drops_holes() {
        let polygon = polygon!(
            exterior: [
                (x: 0., y: 0.),
                (x: 10., y: 0.),
                (x: 10., y: 10.),
                (x: 0., y: 10.),
                (x: 0., y: 0.)
            ],
            interiors: [[(x: 2., y: 2.), (x: 4., y: 2.), (x: 4., y: 4.), (x: 2., y: 2.)]]
        );
        let (kind, grid) = geometry_grid(&Geometry::from(polygon));
        assert_eq!(kind, GeometryType::Polygon);
        assert_eq!(grid.dim(), (5, 2));
        assert_eq!(grid.row(2), array![10., 10.]);
    }

    #[rstest]
    #[case(Geometry::from(MultiPoint::from(vec![(1., 1.), (2., 2.)])), GeometryType::MultiPoint)]
    #[case(
        Geometry::from(MultiLineString::new(vec![line_string![(x: 0., y: 0.), (x: 1., y: 1.)]])),
        GeometryType::MultiLineString
    )]
    #[case(Geometry::from(MultiPolygon::<f64>::new(vec![])), GeometryType::MultiPolygon)]
    #[case(Geometry::GeometryCollection(GeometryCollection::default()), GeometryType::Unknown)]
    fn unsupported_kinds_are_empty(
        #[case] geometry: Geometry<f64>,
        #[case] expected: GeometryType,
    ) {
        let (kind, grid) = geometry_grid(&geometry);
        assert_eq!(kind, expected);
        assert_eq!(grid.dim(), (0, 0));
    }

    #[test_log::test]
    fn extracts_layer_in_order() {
        let mut layer = MemoryLayer::default()
            .with_feature(point!(x: 1., y: 2.))
            .with_feature(MultiPoint::from(vec![(1., 1.)]))
            .with_empty_feature()
            .with_feature(line_string![(x: 0., y: 0.), (x: 1., y: 1.)]);

        let extracted = extract_features(&mut layer).unwrap();
        assert_eq!(extracted.len(), 4);
        let kinds: Vec<GeometryType> = extracted.features.iter().map(|f| f.geometry_type).collect();
        assert_eq!(
            kinds,
            [
                GeometryType::Point,
                GeometryType::MultiPoint,
                GeometryType::Unknown,
                GeometryType::LineString
            ]
        );
        assert_eq!(extracted.features[3].geometry.dim(), (2, 2));
        assert_eq!(extracted.features[3].fid, Some(3));
        assert_eq!(extracted.features[1].geometry.dim(), (0, 0));
    }

    #[test]
    fn layer_can_be_extracted_twice() {
        let mut layer = MemoryLayer::default().with_feature(point!(x: 1., y: 2.));
        assert_eq!(extract_features(&mut layer).unwrap(), extract_features(&mut layer).unwrap());
    }

    #[test]
    fn corrupt_feature_fails_extraction() {
        let mut layer = MemoryLayer::default()
            .with_feature(point!(x: 1., y: 2.))
            .with_corrupt_feature("truncated record");
        match extract_features(&mut layer) {
            Err(MarshalError::FeatureRead { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wkb_codes() {
        assert_eq!(GeometryType::MultiPolygon.wkb_code(), 6);
        assert_eq!(GeometryType::Unknown.wkb_code(), 0);
        assert!(!GeometryType::MultiPoint.is_supported());
    }
}
