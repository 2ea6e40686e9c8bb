//! The gate dictionary: a data table relating native and external gate names.
//!
//! Each [`GateMappingEntry`] states how one native gate is spelled on the
//! external side, how its parameters are scaled and which positional qubit
//! permutation applies. The table is exact: an entry exists only when the
//! two gates are the same unitary up to global phase once parameters and
//! qubits are mapped.
//!
//! Several native gates may share an external name (`cphase01` and
//! `cphase10` both map to `cphaseshift01` with different qubit orders).
//! Exactly one of them is marked `inbound` and is used for reverse lookup.

use std::f64::consts::PI;
use std::fmt;
use std::sync::{Arc, LazyLock};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};

/// Values a parameter may take, in native units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDomain {
    /// Any value, including non-finite ones.
    Any,
    /// Any finite value.
    #[default]
    Finite,
    /// A closed interval.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// No parameter is accepted at this position.
    Absent,
}

impl ParamDomain {
    /// Check whether `value` lies in the domain.
    pub fn contains(self, value: f64) -> bool {
        match self {
            ParamDomain::Any => true,
            ParamDomain::Finite => value.is_finite(),
            ParamDomain::Range { min, max } => (min..=max).contains(&value),
            ParamDomain::Absent => false,
        }
    }
}

impl fmt::Display for ParamDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDomain::Any => write!(f, "any value"),
            ParamDomain::Finite => write!(f, "finite values"),
            ParamDomain::Range { min, max } => write!(f, "[{min}, {max}]"),
            ParamDomain::Absent => write!(f, "no parameter"),
        }
    }
}

/// How one parameter converts: `external = scale * native`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRule {
    /// Multiplier from native to external units.
    pub scale: f64,
    /// Accepted native values.
    #[serde(default)]
    pub domain: ParamDomain,
}

impl ParamRule {
    /// Unit scale, finite values.
    pub const RADIANS: ParamRule = ParamRule::scaled(1.0);

    /// Half-turns to radians.
    pub const HALF_TURNS: ParamRule = ParamRule::scaled(PI);

    /// A finite parameter multiplied by `scale`.
    pub const fn scaled(scale: f64) -> Self {
        Self {
            scale,
            domain: ParamDomain::Finite,
        }
    }

    /// Restrict the domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: ParamDomain) -> Self {
        self.domain = domain;
        self
    }
}

/// Positional qubit relation between the two sides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QubitTransform {
    /// Same positions on both sides.
    #[default]
    Identity,
    /// `external[i] = native[perm[i]]`.
    Permute(Vec<usize>),
}

impl QubitTransform {
    /// Native qubit list to external order.
    pub fn apply_out<T: Copy>(&self, native: &[T]) -> Vec<T> {
        match self {
            QubitTransform::Identity => native.to_vec(),
            QubitTransform::Permute(perm) => perm.iter().map(|&p| native[p]).collect(),
        }
    }

    /// External qubit list to native order.
    pub fn apply_in<T: Copy>(&self, external: &[T]) -> Vec<T> {
        match self {
            QubitTransform::Identity => external.to_vec(),
            QubitTransform::Permute(perm) => {
                let mut native = external.to_vec();
                for (i, &p) in perm.iter().enumerate() {
                    native[p] = external[i];
                }
                native
            }
        }
    }

    fn is_permutation_of(&self, n: usize) -> bool {
        match self {
            QubitTransform::Identity => true,
            QubitTransform::Permute(perm) => {
                let mut seen = vec![false; n];
                perm.len() == n
                    && perm
                        .iter()
                        .all(|&p| p < n && !std::mem::replace(&mut seen[p], true))
            }
        }
    }
}

fn default_inbound() -> bool {
    true
}

/// One row of the dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateMappingEntry {
    /// Native gate name.
    pub native: String,
    /// External gate name.
    pub external: String,
    /// Number of qubits on both sides.
    pub num_qubits: usize,
    /// One rule per parameter, in order.
    #[serde(default)]
    pub params: Vec<ParamRule>,
    /// Qubit relation.
    #[serde(default)]
    pub qubits: QubitTransform,
    /// Whether reverse lookup of `external` resolves to this entry.
    #[serde(default = "default_inbound")]
    pub inbound: bool,
}

impl GateMappingEntry {
    /// A parameterless entry with identity qubits.
    pub fn new(native: impl Into<String>, external: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            native: native.into(),
            external: external.into(),
            num_qubits,
            params: vec![],
            qubits: QubitTransform::Identity,
            inbound: true,
        }
    }

    /// An entry whose name is the same on both sides.
    pub fn same(name: &str, num_qubits: usize) -> Self {
        Self::new(name, name, num_qubits)
    }

    /// Set the parameter rules.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<Vec<ParamRule>>) -> Self {
        self.params = params.into();
        self
    }

    /// Set a qubit permutation, `external[i] = native[perm[i]]`.
    #[must_use]
    pub fn with_permutation(mut self, perm: impl Into<Vec<usize>>) -> Self {
        self.qubits = QubitTransform::Permute(perm.into());
        self
    }

    /// Exclude this entry from reverse lookup.
    #[must_use]
    pub fn outbound_only(mut self) -> Self {
        self.inbound = false;
        self
    }

    /// Native parameters to external units.
    pub fn map_params_out(&self, params: &[f64]) -> BridgeResult<Vec<f64>> {
        self.check_param_count(&self.native, params)?;
        self.params
            .iter()
            .zip(params)
            .enumerate()
            .map(|(position, (rule, &value))| {
                if rule.domain.contains(value) {
                    Ok(rule.scale * value)
                } else {
                    Err(BridgeError::ParameterOutOfRange {
                        gate: self.native.clone(),
                        position,
                        value,
                        domain: rule.domain,
                    })
                }
            })
            .collect()
    }

    /// External parameters to native units.
    pub fn map_params_in(&self, params: &[f64]) -> BridgeResult<Vec<f64>> {
        self.check_param_count(&self.external, params)?;
        self.params
            .iter()
            .zip(params)
            .enumerate()
            .map(|(position, (rule, &value))| {
                let native = value / rule.scale;
                if rule.domain.contains(native) {
                    Ok(native)
                } else {
                    Err(BridgeError::ParameterOutOfRange {
                        gate: self.external.clone(),
                        position,
                        value,
                        domain: rule.domain,
                    })
                }
            })
            .collect()
    }

    /// Native qubit list to external order.
    pub fn map_qubits_out<T: Copy>(&self, native: &[T]) -> BridgeResult<Vec<T>> {
        self.check_arity(&self.native, native.len())?;
        Ok(self.qubits.apply_out(native))
    }

    /// External qubit list to native order.
    pub fn map_qubits_in<T: Copy>(&self, external: &[T]) -> BridgeResult<Vec<T>> {
        self.check_arity(&self.external, external.len())?;
        Ok(self.qubits.apply_in(external))
    }

    fn check_arity(&self, gate: &str, got: usize) -> BridgeResult<()> {
        if got != self.num_qubits {
            return Err(BridgeError::ArityMismatch {
                gate: gate.to_string(),
                expected: self.num_qubits,
                got,
            });
        }
        Ok(())
    }

    fn check_param_count(&self, gate: &str, params: &[f64]) -> BridgeResult<()> {
        match params.len().cmp(&self.params.len()) {
            std::cmp::Ordering::Equal => Ok(()),
            std::cmp::Ordering::Less => Err(BridgeError::ParameterOutOfRange {
                gate: gate.to_string(),
                position: params.len(),
                value: f64::NAN,
                domain: self.params[params.len()].domain,
            }),
            std::cmp::Ordering::Greater => Err(BridgeError::ParameterOutOfRange {
                gate: gate.to_string(),
                position: self.params.len(),
                value: params[self.params.len()],
                domain: ParamDomain::Absent,
            }),
        }
    }

    fn validate(&self) -> BridgeResult<()> {
        if self.num_qubits == 0 {
            return Err(BridgeError::Dictionary(format!(
                "entry '{}' acts on no qubits",
                self.native
            )));
        }
        if !self.qubits.is_permutation_of(self.num_qubits) {
            return Err(BridgeError::Dictionary(format!(
                "entry '{}' has an invalid qubit permutation {:?}",
                self.native, self.qubits
            )));
        }
        if let Some(rule) = self
            .params
            .iter()
            .find(|r| !r.scale.is_finite() || r.scale == 0.0)
        {
            return Err(BridgeError::Dictionary(format!(
                "entry '{}' has non-invertible parameter scale {}",
                self.native, rule.scale
            )));
        }
        Ok(())
    }
}

/// Serialized form of a dictionary.
#[derive(Serialize, Deserialize)]
struct DictionaryFile {
    gates: Vec<GateMappingEntry>,
}

static STANDARD: LazyLock<Arc<GateDictionary>> =
    LazyLock::new(|| Arc::new(GateDictionary::index(standard_entries())));

/// Bidirectional index over [`GateMappingEntry`] rows.
///
/// Read-only once built; share it with `Arc`.
#[derive(Debug, Clone)]
pub struct GateDictionary {
    entries: Vec<GateMappingEntry>,
    by_native: FxHashMap<String, usize>,
    by_external: FxHashMap<String, usize>,
}

impl GateDictionary {
    /// The built-in table, constructed once per process.
    pub fn standard() -> Arc<GateDictionary> {
        Arc::clone(&STANDARD)
    }

    /// Build a dictionary from entries.
    ///
    /// Native names must be unique, and every external name must have exactly
    /// one `inbound` entry.
    pub fn from_entries(entries: impl IntoIterator<Item = GateMappingEntry>) -> BridgeResult<Self> {
        let entries: Vec<GateMappingEntry> = entries.into_iter().collect();

        let mut natives: FxHashSet<&str> = FxHashSet::default();
        let mut inbound: FxHashMap<&str, usize> = FxHashMap::default();
        for entry in &entries {
            entry.validate()?;
            if !natives.insert(&entry.native) {
                return Err(BridgeError::Dictionary(format!(
                    "duplicate native gate '{}'",
                    entry.native
                )));
            }
            let count = inbound.entry(&entry.external).or_insert(0);
            if entry.inbound {
                *count += 1;
            }
        }
        if let Some((external, count)) = inbound.iter().find(|(_, c)| **c != 1) {
            return Err(BridgeError::Dictionary(format!(
                "external gate '{external}' has {count} inbound entries, expected 1"
            )));
        }

        let dictionary = Self::index(entries);
        debug!("Built gate dictionary with {} entries", dictionary.len());
        Ok(dictionary)
    }

    fn index(entries: Vec<GateMappingEntry>) -> Self {
        let by_native = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.native.clone(), i))
            .collect();
        let by_external = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.inbound)
            .map(|(i, e)| (e.external.clone(), i))
            .collect();
        Self {
            entries,
            by_native,
            by_external,
        }
    }

    /// Parse a dictionary from YAML (`gates: [...]`).
    pub fn from_yaml(yaml: &str) -> BridgeResult<Self> {
        let file: DictionaryFile =
            serde_yaml_ng::from_str(yaml).map_err(|e| BridgeError::Dictionary(e.to_string()))?;
        Self::from_entries(file.gates)
    }

    /// Serialize the dictionary to YAML.
    pub fn to_yaml(&self) -> BridgeResult<String> {
        let file = DictionaryFile {
            gates: self.entries.clone(),
        };
        serde_yaml_ng::to_string(&file).map_err(|e| BridgeError::Dictionary(e.to_string()))
    }

    /// Entry for a native gate name.
    pub fn lookup_native(&self, name: &str) -> BridgeResult<&GateMappingEntry> {
        self.by_native
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| BridgeError::UnsupportedGate {
                name: name.to_string(),
                index: 0,
            })
    }

    /// Inbound entry for an external gate name.
    pub fn lookup_external(&self, name: &str) -> BridgeResult<&GateMappingEntry> {
        self.by_external
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| BridgeError::UnsupportedExternalGate {
                name: name.to_string(),
                index: 0,
            })
    }

    /// A copy without the entry for `native`.
    pub fn without_native(&self, native: &str) -> BridgeResult<Self> {
        Self::from_entries(self.entries.iter().filter(|e| e.native != native).cloned())
    }

    /// All entries, in table order.
    pub fn entries(&self) -> &[GateMappingEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn standard_entries() -> Vec<GateMappingEntry> {
    let one = |name: &str| GateMappingEntry::same(name, 1);
    let two = |name: &str| GateMappingEntry::same(name, 2);
    let radians = [ParamRule::RADIANS];

    vec![
        // Single-qubit gates
        one("i"),
        one("x"),
        one("y"),
        one("z"),
        one("h"),
        one("s"),
        one("t"),
        one("v"),
        GateMappingEntry::new("sdg", "si", 1),
        GateMappingEntry::new("tdg", "ti", 1),
        GateMappingEntry::new("vdg", "vi", 1),
        one("rx").with_params(radians),
        one("ry").with_params(radians),
        one("rz").with_params(radians),
        GateMappingEntry::new("phase", "phaseshift", 1).with_params(radians),
        // Two-qubit gates
        two("cnot"),
        two("cy"),
        two("cz"),
        two("swap"),
        two("iswap"),
        GateMappingEntry::new("cphase", "cphaseshift", 2).with_params(radians),
        GateMappingEntry::new("cphase00", "cphaseshift00", 2).with_params(radians),
        GateMappingEntry::new("cphase01", "cphaseshift01", 2).with_params(radians),
        GateMappingEntry::new("cphase10", "cphaseshift01", 2)
            .with_params(radians)
            .with_permutation([1, 0])
            .outbound_only(),
        two("pswap").with_params(radians),
        two("xx").with_params([ParamRule::HALF_TURNS]),
        two("yy").with_params([ParamRule::HALF_TURNS]),
        two("zz").with_params([ParamRule::HALF_TURNS]),
        two("xy").with_params([ParamRule::scaled(-2.0 * PI)]),
        // Three-qubit gates
        GateMappingEntry::same("ccnot", 3),
        GateMappingEntry::same("cswap", 3),
    ]
}
