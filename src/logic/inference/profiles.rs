//! Risk Profile Rule Table
//!
//! Input: asset name
//! Output: RiskProfile
//!
//! Pure, total and deterministic. Empty names are the caller's problem:
//! they still get the fallback profile here.

use crate::logic::assets::KnownAsset;
use crate::models::{Category, Probability, RiskProfile};

/// `impacto` of every asset outside the rule table
pub const FALLBACK_IMPACT: &str = "Impacto potencial en operaciones bancarias y cumplimiento regulatorio";

/// Main classification function
pub fn classify(asset_name: &str) -> RiskProfile {
    match KnownAsset::from_name(asset_name) {
        Some(asset) => known_profile(asset),
        None => fallback_profile(asset_name),
    }
}

/// Hand-authored profile for a known asset
pub fn known_profile(asset: KnownAsset) -> RiskProfile {
    let (riesgo, impacto, probabilidad, categoria) = match asset {
        KnownAsset::DatabaseServer => (
            "Compromiso de integridad y confidencialidad de datos financieros",
            "Exposición de información de clientes, pérdida de confianza, multas regulatorias (hasta $50M)",
            Probability::Media,
            Category::Critico,
        ),
        KnownAsset::TransactionApi => (
            "Interceptación de transacciones financieras en tránsito",
            "Fraude financiero, pérdida de fondos, violación de PCI DSS",
            Probability::Alta,
            Category::Critico,
        ),
        KnownAsset::BankingWebApp => (
            "Ataques de inyección SQL y XSS comprometiendo sesiones de usuarios",
            "Acceso no autorizado a cuentas, robo de identidad, daño reputacional",
            Probability::Alta,
            Category::Alto,
        ),
        KnownAsset::MailServer => (
            "Interceptación de comunicaciones confidenciales y phishing interno",
            "Filtración de información sensible, ataques de ingeniería social",
            Probability::Media,
            Category::Medio,
        ),
        KnownAsset::PerimeterFirewall => (
            "Configuración incorrecta permitiendo acceso no autorizado",
            "Brecha de seguridad, acceso a red interna, compromiso de sistemas",
            Probability::Baja,
            Category::Critico,
        ),
    };

    RiskProfile {
        riesgo: riesgo.to_string(),
        impacto: impacto.to_string(),
        probabilidad,
        categoria,
    }
}

/// Generic profile for anything the table does not know
pub fn fallback_profile(asset_name: &str) -> RiskProfile {
    RiskProfile {
        riesgo: format!("Vulnerabilidad en {} identificada mediante análisis de seguridad", asset_name),
        impacto: FALLBACK_IMPACT.to_string(),
        probabilidad: Probability::Media,
        categoria: Category::Medio,
    }
}

// ============================================================================
// TESTS
// ============================================================================
