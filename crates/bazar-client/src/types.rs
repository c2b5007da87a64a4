//! Raw backend record shapes.
//!
//! The backend mixes Spanish and English keys across endpoints and versions
//! (`nombre`/`name`, `precio`/`price`, `urlImagen`/`image_url`/`imageUrl`, ...)
//! and serializes numbers either as JSON numbers or as strings. Every alias
//! is kept as its own field here; [`crate::normalize`] decides precedence.

use serde::Deserialize;

/// A loosely typed JSON scalar.
///
/// `Other` absorbs arrays and objects so that one odd field never rejects a
/// whole record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Other(serde_json::Value),
}

/// A nested `{ id, name }` reference, as in `product.category`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRef {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<Scalar>,

    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "descripcionDetallada")]
    pub descripcion_detallada: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub precio: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,

    #[serde(default)]
    pub stock: Option<Scalar>,
    #[serde(default, rename = "maxQty", alias = "max_qty")]
    pub max_qty: Option<Scalar>,

    #[serde(default)]
    pub discount_pct: Option<Scalar>,
    #[serde(default, rename = "discountPct")]
    pub discount_pct_camel: Option<Scalar>,

    #[serde(default)]
    pub feature: Option<Scalar>,
    #[serde(default)]
    pub destacado: Option<Scalar>,
    #[serde(default)]
    pub featured: Option<Scalar>,

    #[serde(default, rename = "urlImagen")]
    pub url_imagen: Option<String>,
    #[serde(default, rename = "image_url")]
    pub image_url_snake: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(default, rename = "urlVideo")]
    pub url_video: Option<String>,
    #[serde(default, rename = "video_url")]
    pub video_url_snake: Option<String>,
    #[serde(default, rename = "videoUrl")]
    pub video_url: Option<String>,

    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub code: Option<Scalar>,
    #[serde(default)]
    pub sku: Option<Scalar>,

    #[serde(default)]
    pub garantia: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,

    #[serde(default)]
    pub category_id: Option<Scalar>,
    #[serde(default, rename = "categoryId")]
    pub category_id_camel: Option<Scalar>,
    #[serde(default)]
    pub categoria_id: Option<Scalar>,
    #[serde(default)]
    pub category: Option<RawRef>,
    #[serde(default)]
    pub categoria: Option<RawRef>,
    #[serde(default)]
    pub categoria_nombre: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub subcategoria_id: Option<Scalar>,
    #[serde(default)]
    pub subcategory_id: Option<Scalar>,
    #[serde(default, rename = "subCategoryId")]
    pub sub_category_id_camel: Option<Scalar>,
    #[serde(default, rename = "subcategoryId")]
    pub subcategory_id_camel: Option<Scalar>,
    #[serde(default, alias = "sub_category")]
    pub subcategory: Option<RawRef>,
    #[serde(default)]
    pub subcategoria: Option<RawRef>,
    #[serde(default)]
    pub subcategoria_nombre: Option<String>,
    #[serde(default)]
    pub subcategory_name: Option<String>,

    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<Scalar>,
    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    pub updated_at: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubcategory {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub category_id: Option<Scalar>,
    #[serde(default, rename = "categoryId")]
    pub category_id_camel: Option<Scalar>,
    #[serde(default)]
    pub categoria_id: Option<Scalar>,
}

/// A category record, optionally carrying its subcategories (tree endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub sub_categories: Option<Vec<RawSubcategory>>,
    #[serde(default)]
    pub subcategories: Option<Vec<RawSubcategory>>,
    #[serde(default, rename = "subCats")]
    pub sub_cats: Option<Vec<RawSubcategory>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Pagination block returned next to a product page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub pages: u32,
    #[serde(default, rename = "hasNext", alias = "has_next")]
    pub has_next: bool,
    #[serde(default, rename = "hasPrev", alias = "has_prev")]
    pub has_prev: bool,
}

fn first_page() -> u32 {
    1
}
