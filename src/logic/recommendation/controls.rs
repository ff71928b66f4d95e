//! ISO 27001 Treatment Table
//!
//! (asset, category) -> Annex A control text. `probabilidad` plays no part.
//! Every pair is spelled out; the `Bajo` tier has no entry for any asset.

use crate::logic::assets::KnownAsset;
use crate::models::Category;

/// Treatment for every unmapped (asset, category) pair
pub const FALLBACK_TREATMENT: &str = "A.12.6.1 - Implementar controles de seguridad básicos, A.9.1.1 - Revisar políticas de acceso, A.14.1.1 - Establecer monitoreo";

/// Main recommendation function
pub fn recommend(asset_name: &str, categoria: Category) -> String {
    KnownAsset::from_name(asset_name)
        .and_then(|asset| treatment_for(asset, categoria))
        .unwrap_or(FALLBACK_TREATMENT)
        .to_string()
}

/// Table entry for a known asset, `None` where the table has a gap
pub fn treatment_for(asset: KnownAsset, categoria: Category) -> Option<&'static str> {
    use Category::*;
    use KnownAsset::*;

    match (asset, categoria) {
        (DatabaseServer, Critico) => Some("A.12.6.1 - Implementar cifrado AES-256, A.12.3.1 - Backup diario automatizado, A.9.1.1 - Control de acceso basado en roles"),
        (DatabaseServer, Alto) => Some("A.12.6.1 - Cifrado de datos en reposo, A.12.3.1 - Backup incremental cada 4 horas"),
        (DatabaseServer, Medio) => Some("A.12.3.1 - Backup semanal, A.9.1.1 - Autenticación multifactor"),
        (DatabaseServer, Bajo) => None,

        (TransactionApi, Critico) => Some("A.13.1.1 - Cifrado TLS 1.3, A.13.2.1 - Validación de entrada, A.14.1.1 - Monitoreo en tiempo real"),
        (TransactionApi, Alto) => Some("A.13.1.1 - Cifrado en tránsito, A.13.2.1 - Sanitización de datos"),
        (TransactionApi, Medio) => Some("A.13.1.1 - HTTPS obligatorio, A.14.1.1 - Logging de transacciones"),
        (TransactionApi, Bajo) => None,

        (BankingWebApp, Critico) => Some("A.14.1.1 - WAF (Web Application Firewall), A.9.1.1 - SSO con MFA, A.12.6.1 - Cifrado de sesiones"),
        (BankingWebApp, Alto) => Some("A.14.1.1 - Protección contra OWASP Top 10, A.9.1.1 - Autenticación robusta"),
        (BankingWebApp, Medio) => Some("A.14.1.1 - Validación de entrada, A.9.1.1 - Timeout de sesión"),
        (BankingWebApp, Bajo) => None,

        (MailServer, Critico) => Some("A.13.1.1 - Cifrado S/MIME, A.13.2.1 - Filtrado anti-spam, A.9.1.1 - Control de acceso"),
        (MailServer, Alto) => Some("A.13.1.1 - Cifrado en tránsito, A.13.2.1 - Filtros de contenido"),
        (MailServer, Medio) => Some("A.13.1.1 - TLS obligatorio, A.9.1.1 - Autenticación de usuarios"),
        (MailServer, Bajo) => None,

        (PerimeterFirewall, Critico) => Some("A.13.1.1 - Configuración de reglas estrictas, A.14.1.1 - Monitoreo 24/7, A.12.6.1 - Actualizaciones automáticas"),
        (PerimeterFirewall, Alto) => Some("A.13.1.1 - Segmentación de red, A.14.1.1 - Alertas en tiempo real"),
        (PerimeterFirewall, Medio) => Some("A.13.1.1 - Reglas básicas, A.14.1.1 - Logging de eventos"),
        (PerimeterFirewall, Bajo) => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
