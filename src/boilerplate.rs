//! Static explanatory text printed ahead of the data sections when
//! `include_boilerplate` is set, in each supported language.

/// A block of body content under a subheading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Paragraph(&'static str),
    Bullets(&'static [&'static str]),
}

/// A bold subheading followed by its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub blocks: &'static [Block],
}

pub const SECTIONS_EN: &[Section] = &[
    Section {
        heading: "1. Purpose of this report",
        blocks: &[Block::Paragraph(
            "This report lists the vehicles whose license plates were read by the same \
             traffic radars, within the same time window, as the monitored plate. Plates \
             that repeatedly travel together with the monitored vehicle may indicate \
             escort vehicles, convoys or vehicles under common control, and are presented \
             here as leads for further investigation.",
        )],
    },
    Section {
        heading: "2. Search parameters",
        blocks: &[
            Block::Paragraph(
                "Every pass of the monitored plate inside the search window was taken as a \
                 reference point. For each pass, the plates read by the same radar shortly \
                 before and shortly after it were collected, up to the configured plate limit \
                 on each side.",
            ),
            Block::Bullets(&[
                "Monitored plate: the plate under investigation.",
                "Search window: the period in which passes of the monitored plate were searched.",
                "Plate limit: the maximum number of plates considered before and after each pass.",
            ]),
        ],
    },
    Section {
        heading: "3. Radars and locations",
        blocks: &[Block::Paragraph(
            "Each detection lists the radars involved, the geographic coordinates of the \
             equipment and its registered address. Coordinates are given in decimal degrees \
             (latitude, longitude). Lane numbering follows the convention of the equipment \
             operator.",
        )],
    },
    Section {
        heading: "4. How to read this report",
        blocks: &[Block::Bullets(&[
            "The ranking table counts, across all detections, how often each plate appeared \
             together with the monitored plate, most frequent first.",
            "Each detection section shows the pass of the monitored plate and every plate read \
             in its analysed window, in chronological order.",
            "Rows containing the monitored plate are highlighted.",
            "The occurrence column shows how many times that plate has been seen alongside the \
             monitored plate.",
        ])],
    },
    Section {
        heading: "5. Limitations",
        blocks: &[Block::Bullets(&[
            "Plate reads are produced by automatic recognition and may contain reading errors.",
            "Co-occurrence alone does not establish any relationship between vehicles.",
            "Radars that were offline during the search window contribute no detections.",
        ])],
    },
];

pub const SECTIONS_PT: &[Section] = &[
    Section {
        heading: "1. Finalidade deste relatório",
        blocks: &[Block::Paragraph(
            "Este relatório relaciona os veículos cujas placas foram lidas pelos mesmos \
             radares de trânsito, na mesma janela de tempo, que a placa monitorada. Placas \
             que trafegam repetidamente junto com o veículo monitorado podem indicar \
             veículos de escolta, comboios ou veículos sob controle comum, e são \
             apresentadas aqui como indícios para investigação.",
        )],
    },
    Section {
        heading: "2. Parâmetros da busca",
        blocks: &[
            Block::Paragraph(
                "Cada passagem da placa monitorada dentro do período de busca foi tomada \
                 como ponto de referência. Para cada passagem, foram reunidas as placas lidas \
                 pelo mesmo radar pouco antes e pouco depois dela, até o limite de placas \
                 configurado para cada lado.",
            ),
            Block::Bullets(&[
                "Placa monitorada: a placa sob investigação.",
                "Período de busca: o intervalo em que as passagens da placa monitorada foram buscadas.",
                "Limite de placas: o número máximo de placas consideradas antes e depois de cada passagem.",
            ]),
        ],
    },
    Section {
        heading: "3. Radares e localizações",
        blocks: &[Block::Paragraph(
            "Cada detecção indica os radares envolvidos, as coordenadas geográficas do \
             equipamento e seu endereço cadastrado. As coordenadas são dadas em graus \
             decimais (latitude, longitude). A numeração das faixas segue a convenção do \
             operador do equipamento.",
        )],
    },
    Section {
        heading: "4. Como ler este relatório",
        blocks: &[Block::Bullets(&[
            "O ranking conta, em todas as detecções, quantas vezes cada placa apareceu junto \
             com a placa monitorada, da mais frequente para a menos frequente.",
            "Cada seção de detecção mostra a passagem da placa monitorada e todas as placas \
             lidas na janela analisada, em ordem cronológica.",
            "As linhas que contêm a placa monitorada são destacadas.",
            "A coluna de ocorrência mostra quantas vezes a placa foi vista junto com a placa \
             monitorada.",
        ])],
    },
    Section {
        heading: "5. Limitações",
        blocks: &[Block::Bullets(&[
            "As leituras de placas são feitas por reconhecimento automático e podem conter erros.",
            "A ocorrência conjunta, por si só, não estabelece relação entre veículos.",
            "Radares inativos durante o período de busca não contribuem com detecções.",
        ])],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_content() {
        assert!(!SECTIONS_EN.is_empty());
        for section in SECTIONS_EN.iter().chain(SECTIONS_PT) {
            assert!(!section.heading.is_empty());
            assert!(!section.blocks.is_empty(), "{} has no blocks", section.heading);
        }
    }
}
