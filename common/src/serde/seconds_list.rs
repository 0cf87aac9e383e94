use crate::serde::seconds::duration_from_secs;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{self, Deserializer, Serializer};
use std::fmt;
use std::time::Duration;

pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(durations.len()))?;
    for duration in durations {
        seq.serialize_element(&duration.as_secs_f64())?;
    }
    seq.end()
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecondsVecVisitor;

    impl<'de> Visitor<'de> for SecondsVecVisitor {
        type Value = Vec<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a sequence of seconds")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<Duration>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut durations = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(secs) = seq.next_element::<f64>()? {
                durations.push(duration_from_secs(secs)?);
            }
            Ok(durations)
        }
    }

    deserializer.deserialize_seq(SecondsVecVisitor)
}
