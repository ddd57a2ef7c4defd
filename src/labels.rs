//! Fixed report wording, one set per supported language.
//!
//! The layout engine takes every title, label, column header and message
//! from a [`Labels`] set chosen by [`ReportOptions::language`].
//!
//! [`ReportOptions::language`]: crate::pipeline::ReportOptions::language

use serde::{Deserialize, Serialize};

use crate::boilerplate::{Section, SECTIONS_EN, SECTIONS_PT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &ENGLISH,
            Language::Pt => &PORTUGUESE,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Labels {
    pub report_title: &'static str,
    pub about_title: &'static str,
    pub summary_title: &'static str,
    pub ranking_title: &'static str,
    pub no_groups_title: &'static str,

    pub monitored_plate: &'static str,
    pub search_window: &'static str,
    pub plate_limit: &'static str,
    pub total_monitored: &'static str,
    pub total_all: &'static str,

    pub detection_time: &'static str,
    pub analysed_window: &'static str,
    pub radars: &'static str,
    pub coordinates: &'static str,
    pub address: &'static str,
    pub total_detections: &'static str,

    pub ranking_headers: [&'static str; 2],
    pub detection_headers: [&'static str; 6],

    pub no_ranking: &'static str,
    pub no_detections: &'static str,
    pub no_groups: &'static str,

    /// Title of the only group when there is exactly one.
    pub single_group: &'static str,
    /// `{prefix} N {suffix}` for numbered groups.
    pub group_prefix: &'static str,
    pub group_suffix: &'static str,
    /// `{table} N: {lead} N {tail}` under each detections table.
    pub caption_table: &'static str,
    pub caption_lead: &'static str,
    pub caption_tail: &'static str,

    pub boilerplate: &'static [Section],
}

impl Labels {
    /// Section heading of the `index`-th (0-based) of `count` detection groups.
    pub fn group_title(&self, index: usize, count: usize) -> String {
        if count == 1 {
            self.single_group.to_string()
        } else {
            format!("{} {} {}", self.group_prefix, index + 1, self.group_suffix)
        }
    }

    /// Caption under the detections table of the `number`-th (1-based) group.
    pub fn table_caption(&self, number: usize) -> String {
        format!(
            "{} {number}: {} {number} {}",
            self.caption_table, self.caption_lead, self.caption_tail
        )
    }
}

pub static ENGLISH: Labels = Labels {
    report_title: "JOINT LICENSE-PLATE DETECTION REPORT",
    about_title: "ABOUT THIS REPORT",
    summary_title: "REPORT SUMMARY",
    ranking_title: "CO-OCCURRENCE RANKING",
    no_groups_title: "DETECTIONS OF THE MONITORED PLATE",

    monitored_plate: "Monitored plate",
    search_window: "Search window",
    plate_limit: "Plate limit (before/after each detection)",
    total_monitored: "Total detections of the monitored plate",
    total_all: "Total detections across all radars and plates",

    detection_time: "Detection time",
    analysed_window: "Analysed window",
    radars: "Radars",
    coordinates: "Coordinates",
    address: "Address",
    total_detections: "Total detections",

    ranking_headers: ["Plate", "Occurrences"],
    detection_headers: ["Date/time", "Plate", "Radar", "Lane", "Speed (km/h)", "Occurrence"],

    no_ranking: "No plates were detected together with the monitored plate in the search window.",
    no_detections: "No other plates were detected in the analysed window of this detection.",
    no_groups: "The monitored plate was not detected in the search window.",

    single_group: "SINGLE DETECTION OF THE MONITORED PLATE",
    group_prefix: "DETECTION",
    group_suffix: "OF THE MONITORED PLATE",
    caption_table: "Table",
    caption_lead: "detections jointly observed with occurrence",
    caption_tail: "of the monitored plate",

    boilerplate: SECTIONS_EN,
};

pub static PORTUGUESE: Labels = Labels {
    report_title: "RELATÓRIO DE DETECÇÃO CONJUNTA DE PLACAS",
    about_title: "SOBRE ESTE RELATÓRIO",
    summary_title: "RESUMO DO RELATÓRIO",
    ranking_title: "RANKING DE OCORRÊNCIAS CONJUNTAS",
    no_groups_title: "DETECÇÕES DA PLACA MONITORADA",

    monitored_plate: "Placa monitorada",
    search_window: "Período de busca",
    plate_limit: "Limite de placas (antes/depois de cada detecção)",
    total_monitored: "Total de detecções da placa monitorada",
    total_all: "Total de detecções em todos os radares e placas",

    detection_time: "Horário da detecção",
    analysed_window: "Janela analisada",
    radars: "Radares",
    coordinates: "Coordenadas",
    address: "Endereço",
    total_detections: "Total de detecções",

    ranking_headers: ["Placa", "Ocorrências"],
    detection_headers: ["Data/hora", "Placa", "Radar", "Faixa", "Velocidade (km/h)", "Ocorrência"],

    no_ranking: "Nenhuma placa foi detectada junto com a placa monitorada no período de busca.",
    no_detections: "Nenhuma outra placa foi detectada na janela analisada desta detecção.",
    no_groups: "A placa monitorada não foi detectada no período de busca.",

    single_group: "DETECÇÃO ÚNICA DA PLACA MONITORADA",
    group_prefix: "DETECÇÃO",
    group_suffix: "DA PLACA MONITORADA",
    caption_table: "Tabela",
    caption_lead: "detecções observadas em conjunto com a ocorrência",
    caption_tail: "da placa monitorada",

    boilerplate: SECTIONS_PT,
};
