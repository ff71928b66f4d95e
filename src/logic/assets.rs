//! Known Assets
//!
//! The five banking assets both rule tables have hand-authored entries for.
//! Any other name goes down the fallback branch of each engine.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KnownAsset {
    DatabaseServer,
    TransactionApi,
    BankingWebApp,
    MailServer,
    PerimeterFirewall,
}

impl KnownAsset {
    pub const ALL: [KnownAsset; 5] = [
        Self::DatabaseServer,
        Self::TransactionApi,
        Self::BankingWebApp,
        Self::MailServer,
        Self::PerimeterFirewall,
    ];

    /// Asset name exactly as an analyst types it
    pub fn name(&self) -> &'static str {
        match self {
            Self::DatabaseServer => "Servidor de base de datos",
            Self::TransactionApi => "API Transacciones",
            Self::BankingWebApp => "Aplicación Web de Banca",
            Self::MailServer => "Servidor de Correo",
            Self::PerimeterFirewall => "Firewall Perimetral",
        }
    }

    /// Exact, case-sensitive match. No trimming: "API Transacciones " is unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|asset| asset.name() == name)
    }
}

impl std::fmt::Display for KnownAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
