use crate::dates::PublishedDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Press item exactly as authored in the feed.
///
/// The feed has gone through several schema revisions, so the same concept
/// can live under different keys. [`PressItem::from`] collapses them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPressItem {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub titulo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitulo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub etiqueta: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub fecha: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub imagen: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cuerpo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub contenido: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub archivo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub documento: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub instagram_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub social_url: Option<String>,
}

/// Numbers and booleans keep their text; arrays and objects count as absent.
/// A mistyped field must not cost the whole item.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A press item in the canonical schema every renderer consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PressItem {
    /// Explicitly authored identifier. Use [`crate::identifier`] to get the
    /// identifier an item is actually routed by.
    pub id: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Category,
    pub published: PublishedDate,
    pub image_url: Option<String>,
    pub body: Option<String>,
    pub document_url: Option<String>,
    pub social_embed_url: Option<String>,
}

impl From<RawPressItem> for PressItem {
    fn from(raw: RawPressItem) -> Self {
        let category = first_present([raw.etiqueta, raw.category]);
        let fecha = first_present([raw.fecha, raw.date]);

        PressItem {
            id: present(raw.id),
            slug: present(raw.slug),
            title: first_present([raw.titulo, raw.title]),
            subtitle: first_present([raw.subtitulo, raw.subtitle, raw.excerpt]),
            category: Category::normalize(category.as_deref()),
            published: PublishedDate::parse(fecha.as_deref()),
            image_url: first_present([raw.imagen, raw.image]),
            body: first_present([raw.body, raw.cuerpo, raw.contenido]),
            document_url: first_present([raw.archivo, raw.documento]),
            social_embed_url: first_present([raw.instagram_url, raw.social_url]),
        }
    }
}

impl PressItem {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Sin título")
    }

    /// True if `key` equals the explicit `id` or the explicit `slug`.
    pub fn has_explicit_key(&self, key: &str) -> bool {
        self.id.as_deref() == Some(key) || self.slug.as_deref() == Some(key)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn first_present<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().find_map(present)
}

/// Editorial category of a press item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Noticia,
    Nota,
    Comunicado,
    Documento,
    ProyectoPresentado,
    Actividad,
    Entrevista,
    Opinion,
    EscuelaDeEmprendedores,
    Other(String),
}

impl Category {
    /// Categories offered in the list filter, in display order.
    pub fn filterable() -> [Category; 8] {
        [
            Category::Noticia,
            Category::Nota,
            Category::Comunicado,
            Category::Documento,
            Category::ProyectoPresentado,
            Category::Actividad,
            Category::Entrevista,
            Category::Opinion,
        ]
    }

    /// Map an authored label to a category. Missing labels and the legacy
    /// "Prensa"/"Novedad" labels become [`Category::Noticia`].
    pub fn normalize(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim).filter(|s| !s.is_empty()) else {
            return Category::Noticia;
        };

        match label.to_lowercase().as_str() {
            "noticia" | "prensa" | "novedad" => Category::Noticia,
            "nota" => Category::Nota,
            "comunicado" => Category::Comunicado,
            "documento" => Category::Documento,
            "proyecto presentado" => Category::ProyectoPresentado,
            "actividad" => Category::Actividad,
            "entrevista" => Category::Entrevista,
            "opinión" | "opinion" => Category::Opinion,
            "escuela de emprendedores" => Category::EscuelaDeEmprendedores,
            _ => Category::Other(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Noticia => "Noticia",
            Category::Nota => "Nota",
            Category::Comunicado => "Comunicado",
            Category::Documento => "Documento",
            Category::ProyectoPresentado => "Proyecto presentado",
            Category::Actividad => "Actividad",
            Category::Entrevista => "Entrevista",
            Category::Opinion => "Opinión",
            Category::EscuelaDeEmprendedores => "Escuela de emprendedores",
            Category::Other(label) => label,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Category::Comunicado | Category::Opinion => "badge-magenta",
            Category::Documento => "badge-purple",
            Category::ProyectoPresentado => "badge-orange",
            Category::Actividad => "badge-green",
            Category::EscuelaDeEmprendedores => "badge-cyan",
            Category::Noticia | Category::Nota | Category::Entrevista | Category::Other(_) => {
                "badge-blue"
            }
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_from_json(json: &str) -> RawPressItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_legacy_field_names_collapse() {
        let item = PressItem::from(raw_from_json(
            r#"{
                "titulo": "Sesión ordinaria",
                "subtitulo": "Resumen",
                "etiqueta": "Prensa",
                "fecha": "2024-05-02",
                "imagen": "/uploads/sesion.jpg",
                "contenido": "Texto",
                "documento": "/uploads/acta.pdf",
                "instagram_url": "https://www.instagram.com/p/Cx1/"
            }"#,
        ));

        assert_eq!(item.title.as_deref(), Some("Sesión ordinaria"));
        assert_eq!(item.subtitle.as_deref(), Some("Resumen"));
        assert_eq!(item.category, Category::Noticia);
        assert_eq!(item.published.date(), NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(item.image_url.as_deref(), Some("/uploads/sesion.jpg"));
        assert_eq!(item.body.as_deref(), Some("Texto"));
        assert_eq!(item.document_url.as_deref(), Some("/uploads/acta.pdf"));
        assert_eq!(
            item.social_embed_url.as_deref(),
            Some("https://www.instagram.com/p/Cx1/")
        );
    }

    #[test]
    fn test_body_field_priority() {
        let item = PressItem::from(raw_from_json(
            r#"{"body": "uno", "cuerpo": "dos", "contenido": "tres"}"#,
        ));
        assert_eq!(item.body.as_deref(), Some("uno"));

        let item = PressItem::from(raw_from_json(r#"{"body": "", "cuerpo": "dos"}"#));
        assert_eq!(item.body.as_deref(), Some("dos"));
    }

    #[test]
    fn test_archivo_wins_over_documento() {
        let item = PressItem::from(raw_from_json(
            r#"{"archivo": "/a.pdf", "documento": "/d.pdf"}"#,
        ));
        assert_eq!(item.document_url.as_deref(), Some("/a.pdf"));
    }

    #[test]
    fn test_blank_id_is_absent() {
        let item = PressItem::from(raw_from_json(r#"{"id": "   ", "titulo": "A"}"#));
        assert_eq!(item.id, None);
    }

    #[test]
    fn test_mistyped_scalars_keep_the_item() {
        let item = PressItem::from(raw_from_json(
            r#"{"id": 42, "titulo": "Legacy", "subtitulo": true, "imagen": ["/a.jpg"], "fecha": null}"#,
        ));
        assert_eq!(item.id.as_deref(), Some("42"));
        assert_eq!(item.title.as_deref(), Some("Legacy"));
        assert_eq!(item.subtitle.as_deref(), Some("true"));
        assert_eq!(item.image_url, None);
        assert_eq!(item.published.date(), None);
    }

    #[test]
    fn test_category_legacy_aliases() {
        assert_eq!(Category::normalize(Some("Prensa")), Category::Noticia);
        assert_eq!(Category::normalize(Some(" novedad ")), Category::Noticia);
        assert_eq!(Category::normalize(None), Category::Noticia);
        assert_eq!(Category::normalize(Some("")), Category::Noticia);
        assert_eq!(Category::normalize(Some("Noticia")).label(), "Noticia");
    }

    #[test]
    fn test_category_known_and_other() {
        assert_eq!(
            Category::normalize(Some("Proyecto presentado")),
            Category::ProyectoPresentado
        );
        assert_eq!(Category::normalize(Some("Opinión")), Category::Opinion);
        let other = Category::normalize(Some("Galería"));
        assert_eq!(other, Category::Other("Galería".to_string()));
        assert_eq!(other.label(), "Galería");
        assert!(!other.is_known());
    }

    #[test]
    fn test_badge_classes() {
        assert_eq!(Category::Noticia.badge_class(), "badge-blue");
        assert_eq!(Category::Opinion.badge_class(), "badge-magenta");
        assert_eq!(Category::ProyectoPresentado.badge_class(), "badge-orange");
        assert_eq!(
            Category::Other("Galería".into()).badge_class(),
            "badge-blue"
        );
    }

    #[test]
    fn test_explicit_key_matches_id_or_slug() {
        let item = PressItem {
            id: Some("a".into()),
            slug: Some("b".into()),
            ..Default::default()
        };
        assert!(item.has_explicit_key("a"));
        assert!(item.has_explicit_key("b"));
        assert!(!item.has_explicit_key("c"));
    }
}
