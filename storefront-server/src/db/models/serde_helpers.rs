//! Record-id (de)serialization for the storefront document types
//!
//! 记录 id 跨两个边界时形态不同：HTTP 层携带 `"table:id"` 字符串，
//! 嵌入式引擎返回原生 `RecordId` 结构。下面的辅助模块供模型字段
//! `#[serde(with = ...)]` 使用，两种形态都接受。

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use surrealdb::RecordId;

struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a 'table:id' string or a native record id")
    }

    fn visit_str<E>(self, text: &str) -> Result<RecordId, E>
    where
        E: de::Error,
    {
        text.parse()
            .map_err(|_| E::custom(format!("not a record id: {text}")))
    }

    fn visit_map<M>(self, access: M) -> Result<RecordId, M::Error>
    where
        M: MapAccess<'de>,
    {
        // 原生形态交给 RecordId 自己的反序列化
        RecordId::deserialize(de::value::MapAccessDeserializer::new(access))
    }
}

fn flexible<'de, D>(d: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_any(RecordIdVisitor)
}

/// `#[serde(with = "serde_helpers::record_id")]` - 必填 id 字段
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        flexible(d)
    }
}

/// `#[serde(default, with = "serde_helpers::option_record_id")]` - 可空 id 字段
pub mod option_record_id {
    use super::*;

    struct OptionalVisitor;

    impl<'de> Visitor<'de> for OptionalVisitor {
        type Value = Option<RecordId>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a record id or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, d: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            flexible(d).map(Some)
        }
    }

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_option(OptionalVisitor)
    }
}
