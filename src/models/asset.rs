//! Predefined banking asset catalog

use serde::Serialize;

use super::risk::Category;

/// Suggestion offered by the add-asset dialog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogAsset {
    pub id: u32,
    pub nombre: &'static str,
    pub tipo: &'static str,
    pub criticidad: Category,
}

const fn entry(id: u32, nombre: &'static str, tipo: &'static str, criticidad: Category) -> CatalogAsset {
    CatalogAsset { id, nombre, tipo, criticidad }
}

pub const ASSET_CATALOG: [CatalogAsset; 10] = [
    entry(1, "Servidor de base de datos", "Base de Datos", Category::Critico),
    entry(2, "API Transacciones", "Servicio Web", Category::Critico),
    entry(3, "Aplicación Web de Banca", "Aplicación", Category::Alto),
    entry(4, "Servidor de Correo", "Infraestructura", Category::Medio),
    entry(5, "Firewall Perimetral", "Seguridad", Category::Critico),
    entry(6, "Autenticación MFA", "Seguridad", Category::Alto),
    entry(7, "Registros de Auditoría", "Información", Category::Alto),
    entry(8, "Backup en NAS", "Almacenamiento", Category::Critico),
    entry(9, "Servidor DNS Interno", "Red", Category::Medio),
    entry(10, "Plataforma de Pagos Móviles", "Aplicación", Category::Critico),
];

pub fn catalog() -> &'static [CatalogAsset] {
    &ASSET_CATALOG
}
