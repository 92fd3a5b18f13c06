/// Name search strategies layered over the asset index.
///
/// Both strategies favour recall; the resolver's filter pipeline and the
/// disambiguator narrow whatever they return.
mod distance;
mod token;

pub use distance::EditDistanceResolver;
pub use token::TokenSearch;
