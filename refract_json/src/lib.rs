use log::debug;
use refract::*;
use thiserror::Error;

pub use serde_json;

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("missing field: {0}")]
    Missing(&'static str),

    #[error("invalid field: {0}")]
    Invalid(&'static str),

    #[error("dimension must be 2, got {0}")]
    Dimension(u64),

    #[error(transparent)]
    Scene(#[from] refract::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, JsonError>;

/// This is essentially `try_into` then `try_map` but the latter is nightly-only
pub fn json_array_to_float_array<const D: usize>(
    json_array: &[serde_json::Value],
) -> Option<[Float; D]> {
    let array: &[serde_json::Value; D] = json_array.try_into().ok()?;

    let mut coords = [0.; D];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value.as_f64()? as Float;
    }
    Some(coords)
}

pub fn json_to_vector(json: &serde_json::Value) -> Option<Vector> {
    json.as_array()
        .and_then(|a| json_array_to_float_array::<2>(a))
        .map(Vector::from)
}

fn vector_field(json: &serde_json::Value, key: &'static str) -> Result<Vector> {
    json_to_vector(json.get(key).ok_or(JsonError::Missing(key))?).ok_or(JsonError::Invalid(key))
}

fn float_field(json: &serde_json::Value, key: &'static str) -> Result<Option<Float>> {
    json.get(key)
        .map(|v| v.as_f64().ok_or(JsonError::Invalid(key)))
        .transpose()
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    what: &'static str,
    map: impl FnMut(&serde_json::Value) -> Result<T>,
) -> Result<C> {
    json.as_array()
        .ok_or(JsonError::Invalid(what))?
        .iter()
        .map(map)
        .collect()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> serde_json::Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(T::to_json).collect())
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> serde_json::Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> serde_json::Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &serde_json::Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        map_json_array(json, "array", T::from_json)
    }
}

impl JsonSer for Surface {
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "a": self.a().as_slice(),
            "b": self.b().as_slice(),
            "ratio": self.ratio(),
        })
    }
}

impl JsonDes for Surface {
    /// Deserialize a new surface from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "a": [160., 40.],
    ///     "b": [160., 320.], // (must differ from "a")
    ///     "ratio": 1.5, // (positive)
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let ratio = float_field(json, "ratio")?.ok_or(JsonError::Missing("ratio"))?;

        Ok(Surface::try_new(
            vector_field(json, "a")?,
            vector_field(json, "b")?,
            ratio,
        )?)
    }
}

/// Seed rays. Only the origin, direction and energy of a ray are serialized.
impl JsonSer for Ray {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "direction": self.direction.as_ref().as_slice(),
            "energy": self.energy,
        })
    }
}

impl JsonDes for Ray {
    /// Deserialize a new seed ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [50., 60.],
    ///     "direction": [1., 0.], // (must have at least one non-zero value)
    ///     "energy": 1.0, // (optional, in [0 ; 1], defaults to 1.0)
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let ray = Ray::try_seed(vector_field(json, "origin")?, vector_field(json, "direction")?)?;

        match float_field(json, "energy")? {
            Some(energy) if (0.0..=1.0).contains(&energy) => Ok(ray.with_energy(energy)),
            Some(_) => Err(JsonError::Invalid("energy")),
            None => Ok(ray),
        }
    }
}

impl JsonSer for EngineConfig {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "activation_cap": self.activation_cap,
            "boundary_eps": self.boundary_eps,
            "min_distance": self.min_distance,
            "unbounded_length": self.unbounded_length,
            "min_energy": self.min_energy,
        })
    }
}

impl JsonDes for EngineConfig {
    /// Every field is optional, missing ones take their default value.
    ///
    /// Tolerances and `min_energy` can't be negative, `unbounded_length`
    /// must be positive.
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Some(cap) = json.get("activation_cap") {
            config.activation_cap = cap
                .as_u64()
                .and_then(|c| usize::try_from(c).ok())
                .ok_or(JsonError::Invalid("activation_cap"))?;
        }

        if let Some(eps) = float_field(json, "boundary_eps")? {
            config.boundary_eps = (eps >= 0.0).then_some(eps).ok_or(JsonError::Invalid("boundary_eps"))?;
        }

        if let Some(dist) = float_field(json, "min_distance")? {
            config.min_distance = (dist >= 0.0).then_some(dist).ok_or(JsonError::Invalid("min_distance"))?;
        }

        if let Some(len) = float_field(json, "unbounded_length")? {
            config.unbounded_length = (len > 0.0).then_some(len).ok_or(JsonError::Invalid("unbounded_length"))?;
        }

        if let Some(min) = float_field(json, "min_energy")? {
            config.min_energy = (min >= 0.0).then_some(min).ok_or(JsonError::Invalid("min_energy"))?;
        }

        Ok(config)
    }
}

/// Everything needed to run a pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub config: EngineConfig,
    pub surfaces: Surfaces,
    pub seeds: Vec<Ray>,
}

impl JsonSer for Scene {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "dim": 2,
            "config": self.config.to_json(),
            "surfaces": Vec::from_iter(self.surfaces.iter().map(|(_, s)| s.to_json())),
            "rays": self.seeds.to_json(),
        })
    }
}

impl JsonDes for Scene {
    /// Deserialize a scene from a JSON object of the following format:
    ///
    /// ```json
    /// {
    ///     "dim": 2,
    ///     "config": { ... }, // (optional, see `EngineConfig::from_json`)
    ///     "surfaces": [ ... ], // (see `Surface::from_json`)
    ///     "rays": [ ... ], // (see `Ray::from_json`)
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self> {
        let dim = json
            .get("dim")
            .ok_or(JsonError::Missing("dim"))?
            .as_u64()
            .ok_or(JsonError::Invalid("dim"))?;

        if dim != 2 {
            return Err(JsonError::Dimension(dim));
        }

        let config = json
            .get("config")
            .map(EngineConfig::from_json)
            .transpose()?
            .unwrap_or_default();

        let surfaces: Vec<Surface> = map_json_array(
            json.get("surfaces").ok_or(JsonError::Missing("surfaces"))?,
            "surfaces",
            Surface::from_json,
        )?;

        let seeds: Vec<Ray> = map_json_array(
            json.get("rays").ok_or(JsonError::Missing("rays"))?,
            "rays",
            Ray::from_json,
        )?;

        debug!("loaded scene: {} surface(s), {} ray(s)", surfaces.len(), seeds.len());

        Ok(Self {
            config,
            surfaces: surfaces.into(),
            seeds,
        })
    }
}

impl Scene {
    /// Runs a pass from every seed in this scene.
    #[inline]
    pub fn propagate(&mut self) -> Trace {
        Propagator::new(self.config.clone()).propagate_all(&mut self.surfaces, self.seeds.iter().cloned())
    }
}

fn ray_kind_str(kind: RayKind) -> &'static str {
    match kind {
        RayKind::Seed => "seed",
        RayKind::Reflected => "reflected",
        RayKind::Refracted => "refracted",
    }
}

/// A resolved ray, with everything the propagation found out about it.
fn resolved_ray_to_json(ray: &Ray) -> serde_json::Value {
    serde_json::json!({
        "origin": ray.origin.as_slice(),
        "direction": ray.direction.as_ref().as_slice(),
        "energy": ray.energy,
        "length": ray.length,
        "origin_surface": ray.origin_surface.map(|SurfaceId(i)| i),
        "depth": ray.depth,
        "kind": ray_kind_str(ray.kind),
    })
}

impl JsonSer for PassStats {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "hits": self.hits,
            "total_internal_reflections": self.total_internal_reflections,
            "escaped": self.escaped,
            "dropped": self.dropped,
            "max_depth": self.max_depth,
        })
    }
}

impl JsonSer for Trace {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "rays": Vec::from_iter(self.rays.iter().map(resolved_ray_to_json)),
            "stats": self.stats.to_json(),
        })
    }
}

impl JsonSer for Segment {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "start": self.start.as_slice(),
            "end": self.end.as_slice(),
            "energy": self.energy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn scene_json() -> serde_json::Value {
        json!({
            "dim": 2,
            "surfaces": [
                { "a": [160, 40], "b": [160, 320], "ratio": 1.5 },
                { "a": [240, 40], "b": [240, 320], "ratio": 1.5 },
                { "a": [300, 40], "b": [300, 320], "ratio": 1.5 },
            ],
            "rays": [
                { "origin": [50, 60], "direction": [2, 0] },
            ],
        })
    }

    #[test]
    fn test_scene_defaults() {
        let scene = Scene::from_json(&scene_json()).unwrap();

        assert_eq!(scene.config, EngineConfig::default());
        assert_eq!(scene.surfaces.len(), 3);
        assert_eq!(scene.seeds.len(), 1);
        assert_relative_eq!(scene.seeds[0].direction.x, 1.);
        assert_eq!(scene.seeds[0].energy, 1.);
    }

    #[test]
    fn test_scene_config() {
        let mut json = scene_json();
        json["config"] = json!({ "activation_cap": 7, "min_energy": 0.01 });

        let config = Scene::from_json(&json).unwrap().config;

        assert_eq!(config.activation_cap, 7);
        assert_eq!(config.min_energy, 0.01);
        assert_eq!(config.unbounded_length, EngineConfig::DEFAULT_UNBOUNDED_LENGTH);

        json["config"] = json!({ "activation_cap": -1 });
        assert!(matches!(
            Scene::from_json(&json),
            Err(JsonError::Invalid("activation_cap"))
        ));
    }

    #[test]
    fn test_config_rejects_out_of_range_values() {
        for (key, value) in [
            ("boundary_eps", json!(-1e-9)),
            ("min_distance", json!(-1.0)),
            ("unbounded_length", json!(0)),
            ("unbounded_length", json!(-100.0)),
            ("min_energy", json!(-0.5)),
        ] {
            let mut json = scene_json();
            json["config"] = json!({ key: value });

            assert!(
                matches!(Scene::from_json(&json), Err(JsonError::Invalid(k)) if k == key),
                "{key} = {value} was accepted"
            );
        }

        let mut json = scene_json();
        json["config"] = json!({ "boundary_eps": 0, "min_distance": 0.5 });
        let config = Scene::from_json(&json).unwrap().config;

        assert_eq!(config.boundary_eps, 0.0);
        assert_eq!(config.min_distance, 0.5);
    }

    #[test]
    fn test_segment_json() {
        let segment = Segment {
            start: Vector::new(160., 60.),
            end: Vector::new(-840., 60.),
            energy: 0.04,
        };

        assert_eq!(
            segment.to_json(),
            json!({ "start": [160.0, 60.0], "end": [-840.0, 60.0], "energy": 0.04 })
        );
    }

    #[test]
    fn test_wrong_dimension() {
        let mut json = scene_json();
        json["dim"] = json!(3);

        assert!(matches!(Scene::from_json(&json), Err(JsonError::Dimension(3))));
    }

    #[test]
    fn test_invalid_rays_and_surfaces() {
        let mut json = scene_json();
        json["rays"][0]["direction"] = json!([0, 0]);
        assert!(matches!(
            Scene::from_json(&json),
            Err(JsonError::Scene(refract::Error::ZeroDirection))
        ));

        let mut json = scene_json();
        json["rays"][0]["origin"] = json!([1, 2, 3]);
        assert!(matches!(Scene::from_json(&json), Err(JsonError::Invalid("origin"))));

        let mut json = scene_json();
        json["rays"][0]["energy"] = json!(1.5);
        assert!(matches!(Scene::from_json(&json), Err(JsonError::Invalid("energy"))));

        let mut json = scene_json();
        json["surfaces"][1]["b"] = json!([240, 40]);
        assert!(matches!(
            Scene::from_json(&json),
            Err(JsonError::Scene(refract::Error::DegenerateSurface))
        ));

        let mut json = scene_json();
        json["surfaces"][0].as_object_mut().unwrap().remove("ratio");
        assert!(matches!(Scene::from_json(&json), Err(JsonError::Missing("ratio"))));
    }

    #[test]
    fn test_scene_survives_serialization() {
        let scene = Scene::from_json(&scene_json()).unwrap();
        assert_eq!(Scene::from_json(&scene.to_json()).unwrap(), scene);
    }

    #[test]
    fn test_trace_json() {
        let mut scene = Scene::from_json(&scene_json()).unwrap();
        let trace = scene.propagate();
        let json = trace.to_json();

        let rays = json["rays"].as_array().unwrap();
        assert_eq!(rays.len(), trace.rays.len());

        assert_eq!(rays[0]["kind"], "seed");
        assert_eq!(rays[0]["origin_surface"], serde_json::Value::Null);
        assert_eq!(rays[0]["length"], json!(110.0));

        assert_eq!(rays[1]["kind"], "reflected");
        assert_eq!(rays[1]["origin_surface"], json!(0));
        assert_eq!(rays[1]["length"], serde_json::Value::Null);

        assert_eq!(json["stats"]["hits"], json!(trace.stats.hits));
    }
}
