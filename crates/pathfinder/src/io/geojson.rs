use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::{
    error::{PathfinderError, Result},
    types::{ContourPath, PixelCoordinate},
};

fn number(value: u64) -> serde_json::Value {
    serde_json::Value::Number(serde_json::Number::from(value))
}

impl ContourPath {
    /// Single polygon feature in `(x, y)` order with the ring closed. The shape
    /// summary goes into the properties, the image size into foreign members.
    pub fn to_geojson(&self, image_width: usize, image_height: usize) -> Result<FeatureCollection> {
        let mut ring: Vec<Vec<f64>> = self.xy().iter().map(|&[x, y]| vec![x, y]).collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }
        let geometry = Geometry::new(Value::Polygon(vec![ring]));

        let properties = match serde_json::to_value(self.summary())? {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        };

        let feature = Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(geojson::feature::Id::Number(serde_json::Number::from(0))),
            properties,
            foreign_members: None,
        };

        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("image_width".to_string(), number(image_width as u64));
        foreign_members.insert("image_height".to_string(), number(image_height as u64));

        Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: Some(foreign_members),
        })
    }

    pub fn to_geojson_string(&self, image_width: usize, image_height: usize) -> Result<String> {
        let geojson = self.to_geojson(image_width, image_height)?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    pub fn save_geojson<P: AsRef<Path>>(
        &self,
        path: P,
        image_width: usize,
        image_height: usize,
    ) -> Result<()> {
        std::fs::write(path, self.to_geojson_string(image_width, image_height)?)?;
        Ok(())
    }

    /// Read back the exterior ring of the first polygon feature
    pub fn from_geojson_string(geojson_str: &str) -> Result<Self> {
        let collection: FeatureCollection = geojson_str.parse()?;
        let ring = collection
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .find_map(|geometry| match &geometry.value {
                Value::Polygon(rings) => rings.first().cloned(),
                _ => None,
            })
            .ok_or_else(|| PathfinderError::InvalidShape("no polygon feature found".to_string()))?;

        let mut points = ring
            .iter()
            .map(|position| match position.as_slice() {
                [x, y, ..] if *x >= 0.0 && *y >= 0.0 && x.fract() == 0.0 && y.fract() == 0.0 => {
                    Ok(PixelCoordinate::new(*y as usize, *x as usize))
                }
                _ => Err(PathfinderError::InvalidShape(format!(
                    "position {position:?} is not a pixel coordinate"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        ContourPath::new(points)
    }

    pub fn from_geojson_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let geojson_str = std::fs::read_to_string(path)?;
        Self::from_geojson_string(&geojson_str)
    }
}
