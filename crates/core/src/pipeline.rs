//! Raw listing text in, property records out.

use serde::Serialize;

use crate::assemble::{Assembly, NormalizedProperty, PropertyAssembler};
use crate::config::Config;
use crate::error::Error;
use crate::extract::FieldExtractor;
use crate::segment::{ListingSegmenter, SegmentStrategy};

/// Where the records of a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchSource {
    /// A segmentation strategy split the text into listings.
    Segmented(SegmentStrategy),
    /// No strategy applied; the whole text resolved to one listing.
    WholeText,
    /// Nothing in the text resolved to an address.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub source: BatchSource,
    pub assemblies: Vec<Assembly>,
}

impl Batch {
    pub fn properties(&self) -> Vec<NormalizedProperty> {
        self.assemblies.iter().map(|a| a.property.clone()).collect()
    }

    pub fn into_properties(self) -> Vec<NormalizedProperty> {
        self.assemblies.into_iter().map(|a| a.property).collect()
    }
}

pub struct Pipeline {
    fields: FieldExtractor,
    segmenter: ListingSegmenter,
    assembler: PropertyAssembler,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            fields: FieldExtractor::new(config)?,
            segmenter: ListingSegmenter::new()?,
            assembler: PropertyAssembler::new(config.defaults),
        })
    }

    /// Segment, extract and assemble. Record ids are `{id_prefix}-{index}`.
    pub fn process(&self, text: &str, id_prefix: &str) -> Batch {
        let segmentation = self.segmenter.segment(text, &self.fields);

        let (source, segments) = match segmentation.strategy {
            Some(strategy) => (BatchSource::Segmented(strategy), segmentation.segments),
            None => match self.segmenter.single_listing(text, &self.fields) {
                Some(segment) => (BatchSource::WholeText, vec![segment]),
                None => (BatchSource::Empty, Vec::new()),
            },
        };

        let assemblies: Vec<Assembly> = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                self.assembler
                    .assemble_detailed(segment, format!("{id_prefix}-{i}"))
            })
            .collect();

        log::info!(
            "pipeline: {} propert{} from {:?}",
            assemblies.len(),
            if assemblies.len() == 1 { "y" } else { "ies" },
            source
        );

        Batch {
            source,
            assemblies,
        }
    }

    pub fn parse_listings(&self, text: &str, id_prefix: &str) -> Vec<NormalizedProperty> {
        self.process(text, id_prefix).into_properties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_labeled_sheet() {
        let text = "物件名：AXAS駒込Luxease\n住所：東京都豊島区駒込1-16-8\n階数：6階\n面積：30.31㎡（約9.16坪）\n\
            物件名：ジェイパレス浅草今戸\n住所：東京都台東区今戸1-15-6号\n階数：3階\n面積：25.44㎡\n価格：2,980万円\n";
        let batch = pipeline().process(text, "jp-list-1700000000000");

        assert_eq!(batch.source, BatchSource::Segmented(SegmentStrategy::LabelSplit));
        assert_eq!(batch.assemblies.len(), 2);

        let first = &batch.assemblies[0];
        assert_eq!(first.property.id, "jp-list-1700000000000-0");
        assert_eq!(first.property.area_meters, Some(30.31));
        assert_eq!(first.property.sqft, Some(326));
        assert_eq!(first.property.price_yen, 37_800_000);
        assert!(first.price.was_defaulted);

        let second = &batch.assemblies[1];
        assert_eq!(second.property.id, "jp-list-1700000000000-1");
        assert_eq!(second.property.price_yen, 29_800_000);
        assert!(!second.price.was_defaulted);
        assert_eq!(second.property.bedroom_estimate, 1);
    }

    #[test]
    fn test_single_sheet_as_block() {
        let text = "AXAS駒込Luxease　６階\n専有面積：３０．３１㎡（約９．１６坪）\n間取り：１K\n販売価格：3,780万円";
        let batch = pipeline().process(text, "jp");

        assert_eq!(batch.source, BatchSource::Segmented(SegmentStrategy::Blocks));
        assert_eq!(batch.assemblies.len(), 1);

        let property = &batch.assemblies[0].property;
        assert_eq!(property.address, "東京都豊島区駒込1-16-8");
        assert_eq!(property.property_name.as_deref(), Some("AXAS駒込Luxease"));
        assert_eq!(property.floor.as_deref(), Some("6階"));
        assert_eq!(property.area_meters, Some(30.31));
        assert_eq!(property.area_tsubo, Some(9.16));
        assert_eq!(property.price_yen, 37_800_000);
        assert_eq!(property.layout.as_deref(), Some("1K"));
        assert_eq!(property.bedroom_estimate, 1);
        assert!(property.is_japanese);
    }

    #[test]
    fn test_whole_text_without_price() {
        let text = "AXAS駒込Luxease 6F\n間取り 1K";
        let batch = pipeline().process(text, "jp");

        assert_eq!(batch.source, BatchSource::WholeText);
        assert_eq!(batch.assemblies.len(), 1);
        assert_eq!(batch.assemblies[0].property.address, "東京都豊島区駒込1-16-8");
        assert_eq!(batch.assemblies[0].property.floor.as_deref(), Some("6階"));
        assert!(batch.assemblies[0].price.was_defaulted);
        assert!(batch.assemblies[0].area.was_defaulted);
    }

    #[test]
    fn test_ambiguous_text_yields_nothing() {
        let batch = pipeline().process("お問い合わせください", "jp");
        assert_eq!(batch.source, BatchSource::Empty);
        assert!(batch.assemblies.is_empty());
    }

    #[test]
    fn test_never_fabricates_coordinates() {
        let text = "物件名：A\n住所：東京都北区田端1-2-3\n";
        let properties = pipeline().parse_listings(text, "jp");

        assert_eq!(properties.len(), 1);
        assert!(properties.iter().all(|p| p.lat.is_none() && p.lng.is_none()));
    }
}
