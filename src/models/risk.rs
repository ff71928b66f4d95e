//! Risk register model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `tratamiento` value of a row no recommendation pass has touched yet
pub const TREATMENT_PLACEHOLDER: &str = "-";

// ============================================================================
// ORDINAL TIERS
// ============================================================================

/// Likelihood tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Probability {
    Baja,
    Media,
    Alta,
}

impl Probability {
    pub const ALL: [Probability; 3] = [Self::Baja, Self::Media, Self::Alta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baja => "Baja",
            Self::Media => "Media",
            Self::Alta => "Alta",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Alta => "#ff4d4f",  // Red
            Self::Media => "#faad14", // Amber
            Self::Baja => "#52c41a",  // Green
        }
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Probability {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_tier_name(s);
        Self::ALL
            .into_iter()
            .find(|p| fold_tier_name(p.as_str()) == folded)
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// Severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Bajo,
    Medio,
    Alto,
    #[serde(rename = "Crítico", alias = "Critico")]
    Critico,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Bajo, Self::Medio, Self::Alto, Self::Critico];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bajo => "Bajo",
            Self::Medio => "Medio",
            Self::Alto => "Alto",
            Self::Critico => "Crítico",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Critico => "#ff4d4f", // Red
            Self::Alto => "#fa8c16",    // Orange
            Self::Medio => "#faad14",   // Amber
            Self::Bajo => "#52c41a",    // Green
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_tier_name(s);
        Self::ALL
            .into_iter()
            .find(|c| fold_tier_name(c.as_str()) == folded)
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a known tier")]
pub struct UnknownTier(pub String);

fn fold_tier_name(s: &str) -> String {
    s.trim().to_lowercase().replace('í', "i")
}

// ============================================================================
// PROFILE / ROW
// ============================================================================

/// Engine output for one asset, merged into a row at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub riesgo: String,
    pub impacto: String,
    pub probabilidad: Probability,
    pub categoria: Category,
}

/// One evaluated asset in the register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRow {
    pub key: String,
    pub activo: String,
    pub riesgo: String,
    pub impacto: String,
    pub probabilidad: Probability,
    pub categoria: Category,
    pub tratamiento: String,
}

impl RiskRow {
    /// Current value of a column as the grid shows it. `None` for the action column.
    pub fn value(&self, column: Column) -> Option<String> {
        match column {
            Column::Activo => Some(self.activo.clone()),
            Column::Riesgo => Some(self.riesgo.clone()),
            Column::Impacto => Some(self.impacto.clone()),
            Column::Probabilidad => Some(self.probabilidad.to_string()),
            Column::Categoria => Some(self.categoria.to_string()),
            Column::Tratamiento => Some(self.tratamiento.clone()),
            Column::Operation => None,
        }
    }

    /// Merge a partial update; `key` is never part of a patch.
    pub fn apply(&mut self, patch: RiskRowPatch) {
        if let Some(activo) = patch.activo {
            self.activo = activo;
        }
        if let Some(riesgo) = patch.riesgo {
            self.riesgo = riesgo;
        }
        if let Some(impacto) = patch.impacto {
            self.impacto = impacto;
        }
        if let Some(probabilidad) = patch.probabilidad {
            self.probabilidad = probabilidad;
        }
        if let Some(categoria) = patch.categoria {
            self.categoria = categoria;
        }
        if let Some(tratamiento) = patch.tratamiento {
            self.tratamiento = tratamiento;
        }
    }
}

/// Partial field set for `RiskRegistry::update`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRowPatch {
    pub activo: Option<String>,
    pub riesgo: Option<String>,
    pub impacto: Option<String>,
    pub probabilidad: Option<Probability>,
    pub categoria: Option<Category>,
    pub tratamiento: Option<String>,
}

// ============================================================================
// GRID COLUMNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Activo,
    Riesgo,
    Impacto,
    Probabilidad,
    Categoria,
    Tratamiento,
    Operation,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Self::Activo,
        Self::Riesgo,
        Self::Impacto,
        Self::Probabilidad,
        Self::Categoria,
        Self::Tratamiento,
        Self::Operation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Riesgo => "Riesgo",
            Self::Impacto => "Impacto",
            Self::Probabilidad => "Probabilidad",
            Self::Categoria => "Categoría",
            Self::Tratamiento => "Tratamiento ISO 27001",
            Self::Operation => "Operación",
        }
    }

    /// The delete-action column never enters edit mode.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Operation)
    }
}
