use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields of a record that are carried through without being interpreted
/// (bbox, area, segmentation, width, height, supercategory...), in input order.
pub type ExtraFields = Map<String, Value>;

/// A COCO annotation file. `categories`, `images` and `annotations` are required,
/// `info` and `licenses` are opaque and default to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoDatasetJson {
    #[serde(default = "empty_info")]
    pub info: Value,
    #[serde(default)]
    pub licenses: Vec<Value>,
    pub categories: Vec<Category>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
}

impl Default for CocoDatasetJson {
    fn default() -> Self {
        CocoDatasetJson {
            info: empty_info(),
            licenses: vec![],
            categories: vec![],
            images: vec![],
            annotations: vec![],
        }
    }
}

fn empty_info() -> Value {
    Value::Object(Map::new())
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub file_name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    pub image_id: i64,
    pub category_id: i64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
