//! Concrete service implementations behind the engine's trait seams

pub mod candidates;
pub mod narrator;
pub mod nominatim;
pub mod overpass;
pub mod synthetic;

pub use candidates::RadialCandidateSource;
pub use narrator::{GeminiNarrator, TemplateNarrator};
pub use nominatim::NominatimGeocoder;
pub use overpass::OsmGeoData;
pub use synthetic::{SyntheticGeoData, SyntheticGeocoder};
