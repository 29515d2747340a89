//! Algorithm lookup by name.

use crate::algorithm::Optimizer;
use crate::de::{DeConfig, DifferentialEvolution};
use crate::error::{Error, Result};
use crate::mts::{MtsConfig, MultipleTrajectorySearch};

/// Short names of every registered algorithm.
pub const ALGORITHM_NAMES: [&str; 18] = [
    "DE",
    "jDE",
    "MsDE",
    "MsjDE",
    "dynNpDE",
    "dynNpjDE",
    "dynNpMsDE",
    "ANpDE",
    "DEMTS",
    "DEMTSv1",
    "dynNpDEMTS",
    "dynNpDEMTSv1",
    "MSDEMTS",
    "MSDEMTSv1",
    "dynNpMSDEMTS",
    "dynNpMSDEMTSv1",
    "MTS",
    "MTSv1",
];

/// Builds a preset algorithm from its short or long name.
///
/// Matching ignores ASCII case. Both `dynNpMsDE` and
/// `DynNpMultiStrategyDifferentialEvolution` resolve to the same preset.
///
/// # Errors
/// Returns [`Error::UnknownAlgorithm`] for unregistered names.
///
/// # Examples
///
/// ```
/// use u_evolve::experiment::algorithm_by_name;
///
/// let algo = algorithm_by_name("msjde", Some(7)).unwrap();
/// assert_eq!(algo.algorithm_name(), "MsjDE");
/// assert!(algorithm_by_name("NoSuchAlgorithm", None).is_err());
/// ```
pub fn algorithm_by_name(name: &str, seed: Option<u64>) -> Result<Box<dyn Optimizer>> {
    let de = |config: DeConfig| -> Result<Box<dyn Optimizer>> {
        let config = match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        };
        Ok(Box::new(DifferentialEvolution::new(config)?))
    };
    let mts = |config: MtsConfig| -> Result<Box<dyn Optimizer>> {
        let config = match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        };
        Ok(Box::new(MultipleTrajectorySearch::new(config)?))
    };

    match name.to_ascii_lowercase().as_str() {
        "de" | "differentialevolution" => de(DeConfig::de()),
        "jde" | "selfadaptivedifferentialevolution" => de(DeConfig::jde()),
        "msde" | "multistrategydifferentialevolution" => de(DeConfig::ms_de()),
        "msjde" | "multistrategyselfadaptivedifferentialevolution" => de(DeConfig::ms_jde()),
        "dynnpde" | "dynnpdifferentialevolution" => de(DeConfig::dyn_np_de()),
        "dynnpjde" | "dynnpselfadaptivedifferentialevolution" => de(DeConfig::dyn_np_jde()),
        "dynnpmsde" | "dynnpmultistrategydifferentialevolution" => de(DeConfig::dyn_np_ms_de()),
        "anpde" | "agingnpdifferentialevolution" => de(DeConfig::aging_np_de()),
        "demts" | "differentialevolutionmts" => de(DeConfig::de_mts()),
        "demtsv1" | "differentialevolutionmtsv1" => de(DeConfig::de_mts_v1()),
        "dynnpdemts" | "dynnpdifferentialevolutionmts" => de(DeConfig::dyn_np_de_mts()),
        "dynnpdemtsv1" | "dynnpdifferentialevolutionmtsv1" => de(DeConfig::dyn_np_de_mts_v1()),
        "msdemts" | "multistrategydifferentialevolutionmts" => de(DeConfig::ms_de_mts()),
        "msdemtsv1" | "multistrategydifferentialevolutionmtsv1" => de(DeConfig::ms_de_mts_v1()),
        "dynnpmsdemts" | "dynnpmultistrategydifferentialevolutionmts" => {
            de(DeConfig::dyn_np_ms_de_mts())
        }
        "dynnpmsdemtsv1" | "dynnpmultistrategydifferentialevolutionmtsv1" => {
            de(DeConfig::dyn_np_ms_de_mts_v1())
        }
        "mts" | "multipletrajectorysearch" => mts(MtsConfig::mts()),
        "mtsv1" | "multipletrajectorysearchv1" => mts(MtsConfig::mts_v1()),
        _ => Err(Error::UnknownAlgorithm(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_short_name_round_trips() {
        for name in ALGORITHM_NAMES {
            let algo = algorithm_by_name(name, Some(1)).unwrap();
            assert_eq!(algo.algorithm_name(), name);
        }
    }

    #[test]
    fn test_long_names_and_case() {
        let algo = algorithm_by_name("DynNpMultiStrategyDifferentialEvolutionMTSv1", None).unwrap();
        assert_eq!(algo.algorithm_name(), "dynNpMSDEMTSv1");
        let algo = algorithm_by_name("MULTIPLETRAJECTORYSEARCH", None).unwrap();
        assert_eq!(algo.algorithm_name(), "MTS");
        let algo = algorithm_by_name("jde", None).unwrap();
        assert_eq!(algo.algorithm_name(), "jDE");
        let algo = algorithm_by_name("AgingNpDifferentialEvolution", None).unwrap();
        assert_eq!(algo.algorithm_name(), "ANpDE");
    }

    #[test]
    fn test_unknown_name() {
        match algorithm_by_name("GeneticAlgorithm", None) {
            Err(Error::UnknownAlgorithm(name)) => assert_eq!(name, "GeneticAlgorithm"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }
}
