//! Authored semantic context for the keyword taxonomy.
//!
//! One entry per canonical keyword label: synonyms, related terms, colloquial
//! variations and short example sentences written the way guests actually
//! phrase feedback. The entries feed embedding enrichment only; order inside
//! each list does not matter for matching, but `enrich_for_embedding` slices
//! `related_terms` and `examples`, so the most representative items go first.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Hand-authored context for one keyword label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordContext {
    pub synonyms: &'static [&'static str],
    pub related_terms: &'static [&'static str],
    pub colloquial_variations: &'static [&'static str],
    pub examples: &'static [&'static str],
}

static KEYWORD_CONTEXTS: &[(&str, KeywordContext)] = &[
    // A&B
    (
        "A&B - Café da manhã",
        KeywordContext {
            synonyms: &["breakfast", "desjejum", "primeira refeição", "café"],
            related_terms: &[
                "comida", "refeição", "buffet", "alimento", "pão", "bolo", "fruta", "suco",
                "leite", "queijo", "presunto", "ovo", "tapioca", "iogurte", "cereal", "granola",
                "café preto", "café com leite", "chá",
            ],
            colloquial_variations: &["café da manhã", "café", "breakfast", "manhã", "buffet da manhã"],
            examples: &[
                "café da manhã estava delicioso",
                "buffet da manhã variado",
                "breakfast excelente",
            ],
        },
    ),
    (
        "A&B - Jantar",
        KeywordContext {
            synonyms: &["dinner", "janta", "refeição da noite", "jantar"],
            related_terms: &[
                "comida", "prato", "refeição", "noite", "restaurante", "menu", "cardápio",
                "jantar", "ceia",
            ],
            colloquial_variations: &["jantar", "janta", "comida da noite", "dinner"],
            examples: &[
                "jantar estava ótimo",
                "comida do jantar deliciosa",
                "restaurante no jantar excelente",
            ],
        },
    ),
    (
        "A&B - Almoço",
        KeywordContext {
            synonyms: &["lunch", "refeição do meio-dia", "almoço"],
            related_terms: &["comida", "prato", "refeição", "meio-dia", "restaurante", "menu"],
            colloquial_variations: &["almoço", "almoçar", "comida do meio-dia", "lunch"],
            examples: &["almoço estava ótimo", "comida do almoço deliciosa"],
        },
    ),
    (
        "A&B - Serviço",
        KeywordContext {
            synonyms: &["atendimento restaurante", "serviço restaurante", "staff A&B"],
            related_terms: &[
                "garçom", "garçonete", "atendente", "funcionário", "staff", "atendimento",
                "serviço", "prestativo", "atencioso", "educado", "preço", "cardápio", "menu",
                "variedade", "opções", "restaurante", "bar", "café da manhã", "maître",
                "recepção do restaurante",
            ],
            colloquial_variations: &["garçom", "moço", "moça", "atendente", "pessoal do restaurante"],
            examples: &[
                "garçom muito atencioso",
                "atendimento do restaurante excelente",
                "atendente do café da manhã muito educada",
                "recepção do restaurante com serviço impecável",
                "maître do restaurante prestativo",
                "preço justo no restaurante",
                "cardápio variado",
            ],
        },
    ),
    (
        "A&B - Gastronomia",
        KeywordContext {
            synonyms: &["culinária", "cozinha", "comida", "alimentação", "food"],
            related_terms: &[
                "comida", "prato", "refeição", "sabor", "tempero", "qualidade", "delicioso",
                "saboroso", "gostoso", "bem feito", "fresco",
            ],
            colloquial_variations: &["comida", "comidinha", "pratão", "refeição"],
            examples: &[
                "comida estava deliciosa",
                "pratos muito bem feitos",
                "gastronomia excelente",
            ],
        },
    ),
    (
        "A&B - Room Service",
        KeywordContext {
            synonyms: &["serviço de quarto", "room service", "comida no quarto"],
            related_terms: &[
                "quarto", "pedido", "entrega", "telefone", "cardápio", "comida", "bebida",
                "atendimento", "demora", "rápido",
            ],
            colloquial_variations: &["room service", "comida no quarto", "pedido no quarto"],
            examples: &[
                "room service rápido",
                "comida no quarto deliciosa",
                "serviço de quarto eficiente",
            ],
        },
    ),
    // Governança
    (
        "Limpeza - Banheiro",
        KeywordContext {
            synonyms: &["higiene do banheiro", "limpeza sanitária"],
            related_terms: &[
                "banheiro limpo", "banheiro sujo", "sanitário limpo", "toalete limpo",
                "lavabo limpo", "pia suja", "vaso sujo", "box sujo", "chuveiro sujo",
                "azulejo sujo", "espelho sujo", "higiene", "sujeira", "limpar",
            ],
            colloquial_variations: &["banheiro sujo", "banheiro limpo", "wc sujo", "lavabo sujo"],
            examples: &[
                "banheiro estava sujo",
                "falta de limpeza no banheiro",
                "banheiro limpíssimo",
                "pia do banheiro suja",
            ],
        },
    ),
    (
        "Limpeza - Quarto",
        KeywordContext {
            synonyms: &["arrumação", "higiene", "cleaning", "housekeeping"],
            related_terms: &[
                "quarto limpo", "quarto sujo", "acomodação limpa", "arrumado", "bagunçado",
                "camareira", "governança", "cama suja", "lençol sujo", "toalha suja",
                "chão sujo", "poeira", "sujeira", "limpeza", "arrumação",
            ],
            colloquial_variations: &["quarto sujo", "quarto limpo", "arrumação", "camareira"],
            examples: &[
                "quarto estava sujo",
                "falta de limpeza no quarto",
                "quarto limpíssimo",
                "camareira não limpou",
            ],
        },
    ),
    (
        "Limpeza - Áreas sociais",
        KeywordContext {
            synonyms: &["limpeza áreas comuns", "higiene espaços comuns"],
            related_terms: &[
                "lobby", "recepção", "corredor", "elevador", "piscina", "academia",
                "restaurante", "limpo", "sujo", "organizado",
            ],
            colloquial_variations: &["áreas comuns", "espaços comuns", "lobby"],
            examples: &[
                "áreas comuns sempre limpas",
                "lobby organizado",
                "espaços bem cuidados",
            ],
        },
    ),
    (
        "Limpeza - Enxoval",
        KeywordContext {
            synonyms: &["roupa de cama", "lençóis", "toalhas"],
            related_terms: &[
                "lençol", "toalha", "fronha", "cobertor", "travesseiro", "limpo", "sujo",
                "manchado", "rasgado", "novo", "velho",
            ],
            colloquial_variations: &["lençol", "toalha", "roupa de cama"],
            examples: &["lençóis limpos", "toalhas macias", "enxoval de qualidade"],
        },
    ),
    (
        "Limpeza - Amenities",
        KeywordContext {
            synonyms: &["amenidades", "produtos de banho", "itens de cortesia"],
            related_terms: &[
                "shampoo", "sabonete", "condicionador", "creme", "gel", "escova", "pente",
                "cotonete", "qualidade", "falta",
            ],
            colloquial_variations: &["amenities", "produtos", "itens de banho"],
            examples: &["amenities de qualidade", "produtos de banho bons", "faltou shampoo"],
        },
    ),
    (
        "Limpeza - Frigobar",
        KeywordContext {
            synonyms: &["frigobar", "minibar", "geladeira do quarto"],
            related_terms: &[
                "frigobar", "bebida", "água", "refrigerante", "cerveja", "limpo", "sujo",
                "gelado", "quente", "preço", "caro",
            ],
            colloquial_variations: &["frigobar", "geladeira", "minibar"],
            examples: &["frigobar limpo", "bebidas geladas", "preço alto no frigobar"],
        },
    ),
    // Manutenção
    (
        "Manutenção - Ar-condicionado",
        KeywordContext {
            synonyms: &["climatização", "ar condicionado", "AC"],
            related_terms: &[
                "ar", "temperatura", "frio", "quente", "gelado", "não funciona", "quebrado",
                "barulhento", "ruidoso", "pingando", "vazando",
            ],
            colloquial_variations: &["ar", "ar condicionado", "climatização"],
            examples: &[
                "ar condicionado não funcionava",
                "ar não gelava",
                "ar barulhento",
            ],
        },
    ),
    (
        "Manutenção - Banheiro",
        KeywordContext {
            synonyms: &["reparo banheiro", "conserto banheiro"],
            related_terms: &[
                "chuveiro", "torneira", "vaso", "descarga", "ralo", "vazamento", "entupido",
                "quebrado", "pingando",
            ],
            colloquial_variations: &["chuveiro quebrado", "vaso entupido", "torneira pingando"],
            examples: &[
                "chuveiro não funcionava",
                "vaso sanitário entupido",
                "torneira pingando",
            ],
        },
    ),
    (
        "Manutenção - Instalações",
        KeywordContext {
            synonyms: &["infraestrutura", "estrutura física", "instalações", "espaço", "tamanho"],
            related_terms: &[
                "parede", "teto", "piso", "porta", "janela", "fechadura", "rachadura",
                "infiltração", "mofo", "umidade", "banheiro apertado", "banheiro pequeno",
                "banheiro estreito", "quarto apertado", "quarto pequeno", "quarto estreito",
                "espaço", "tamanho", "dimensão", "apertado", "pequeno", "estreito", "área",
                "amplo", "grande", "reduzido", "compacto",
            ],
            colloquial_variations: &["infraestrutura", "estrutura", "instalações", "apertado", "pequeno"],
            examples: &[
                "instalações precisam de reforma",
                "infraestrutura antiga",
                "parede com infiltração",
                "banheiro muito apertado",
                "quarto pequeno demais",
                "espaço reduzido",
            ],
        },
    ),
    (
        "Manutenção - Quarto",
        KeywordContext {
            synonyms: &["reparo quarto", "conserto quarto"],
            related_terms: &[
                "tv", "controle", "tomada", "luz", "lâmpada", "cortina", "persiana",
                "fechadura", "porta", "janela", "não funciona",
            ],
            colloquial_variations: &["tv não funciona", "luz queimada", "tomada quebrada"],
            examples: &["tv não ligava", "lâmpada queimada", "tomada não funcionava"],
        },
    ),
    (
        "Manutenção - Elevador",
        KeywordContext {
            synonyms: &["elevadores", "ascensor"],
            related_terms: &[
                "elevador", "não funciona", "quebrado", "lento", "demora", "parado",
                "fora de serviço", "escada",
            ],
            colloquial_variations: &["elevador", "elevadores", "lift"],
            examples: &[
                "elevador não funcionava",
                "elevadores sempre quebrados",
                "demora no elevador",
            ],
        },
    ),
    (
        "Manutenção - Jardinagem",
        KeywordContext {
            synonyms: &["jardim", "paisagismo", "área verde"],
            related_terms: &[
                "jardim", "planta", "grama", "árvore", "flor", "bem cuidado", "mal cuidado",
                "bonito", "feio",
            ],
            colloquial_variations: &["jardim", "área verde", "paisagem"],
            examples: &["jardim bem cuidado", "área verde bonita", "plantas bonitas"],
        },
    ),
    // Recepção
    (
        "Recepção - Estacionamento",
        KeywordContext {
            synonyms: &["garagem", "vaga", "parking"],
            related_terms: &[
                "estacionamento", "garagem", "vaga", "carro", "veículo", "manobrista",
                "grátis", "pago", "seguro", "longe", "perto",
            ],
            colloquial_variations: &["estacionamento", "garagem", "vaga"],
            examples: &["estacionamento gratuito", "garagem segura", "faltou vaga"],
        },
    ),
    (
        "Recepção - Check-in",
        KeywordContext {
            synonyms: &["entrada", "chegada", "registro"],
            related_terms: &[
                "check-in", "entrada", "chegada", "registro", "recepção", "demorado", "rápido",
                "eficiente", "fila", "processo",
            ],
            colloquial_variations: &["check-in", "entrada", "chegada"],
            examples: &["check-in demorado", "processo de entrada lento", "check-in eficiente"],
        },
    ),
    (
        "Recepção - Check-out",
        KeywordContext {
            synonyms: &["saída", "partida", "encerramento"],
            related_terms: &[
                "check-out", "saída", "partida", "recepção", "conta", "demorado", "rápido",
                "eficiente",
            ],
            colloquial_variations: &["check-out", "saída", "partida"],
            examples: &["check-out demorado", "processo de saída lento", "check-out eficiente"],
        },
    ),
    (
        "Recepção - Serviço",
        KeywordContext {
            synonyms: &["atendimento recepção", "front desk"],
            related_terms: &[
                "recepcionista", "atendente", "funcionário", "staff", "educado", "prestativo",
                "atencioso", "rude", "grosseiro", "empréstimo", "ferro", "item", "informação",
                "lobby", "check-in", "check-out", "recepção do hotel", "entrada",
            ],
            colloquial_variations: &["recepção", "recepcionista", "front desk"],
            examples: &[
                "recepcionista muito educada",
                "atendimento da recepção excelente",
                "atendimento no lobby impecável",
                "recepção do hotel muito atenciosa",
                "funcionários do check-in prestativos",
                "empréstimo de ferro rápido",
            ],
        },
    ),
    // TI
    (
        "Tecnologia - TV",
        KeywordContext {
            synonyms: &["televisão", "televisor", "tv a cabo"],
            related_terms: &[
                "tv", "televisão", "canais", "controle", "smart tv", "não funciona", "não liga",
                "sem sinal", "cabo",
            ],
            colloquial_variations: &["tv", "televisão", "televisor"],
            examples: &["tv não funcionava", "televisão sem sinal", "poucos canais"],
        },
    ),
    (
        "Tecnologia - Wi-fi",
        KeywordContext {
            synonyms: &["internet", "wifi", "wireless", "conexão", "rede"],
            related_terms: &[
                "wifi", "wi-fi", "internet", "conexão", "rede", "wireless", "lento", "rápido",
                "não funciona", "não pega", "cai", "senha", "sinal",
            ],
            colloquial_variations: &["wifi", "wi-fi", "internet", "net", "conexão"],
            examples: &["wifi não funcionava", "internet muito lenta", "wi-fi instável"],
        },
    ),
    // Lazer
    (
        "Lazer - Estrutura",
        KeywordContext {
            synonyms: &["infraestrutura de lazer", "instalações de lazer"],
            related_terms: &[
                "estrutura", "instalação", "espaço", "área", "qualidade", "boa", "ruim",
                "antiga", "moderna", "nova", "velha",
            ],
            colloquial_variations: &["estrutura", "instalações", "espaço de lazer"],
            examples: &[
                "estrutura de lazer excelente",
                "instalações bem cuidadas",
                "área de lazer ampla",
            ],
        },
    ),
    (
        "Lazer - Variedade",
        KeywordContext {
            synonyms: &["diversidade de atividades", "opções de lazer"],
            related_terms: &[
                "variedade", "opções", "atividades", "diversidade", "escolha", "pouca", "muita",
                "falta",
            ],
            colloquial_variations: &["variedade", "opções", "atividades"],
            examples: &[
                "pouca variedade de atividades",
                "muitas opções de lazer",
                "falta atividades",
            ],
        },
    ),
    (
        "Lazer - Serviço",
        KeywordContext {
            synonyms: &["atendimento lazer", "staff lazer"],
            related_terms: &[
                "atendente", "funcionário", "staff", "monitor", "instrutor", "educado",
                "prestativo", "atencioso", "rude",
            ],
            colloquial_variations: &["atendimento", "pessoal do lazer", "funcionários"],
            examples: &[
                "atendimento na piscina excelente",
                "funcionários do lazer prestativos",
                "monitor atencioso",
            ],
        },
    ),
    (
        "Lazer - Atividades de Lazer",
        KeywordContext {
            synonyms: &["programação", "entretenimento", "recreação"],
            related_terms: &[
                "atividade", "programação", "entretenimento", "recreação", "jogo", "música",
                "show", "festa", "animação",
            ],
            colloquial_variations: &["atividades", "programação", "entretenimento"],
            examples: &[
                "atividades de lazer divertidas",
                "programação variada",
                "entretenimento para crianças",
            ],
        },
    ),
    (
        "Lazer - Piscina",
        KeywordContext {
            synonyms: &["pool", "piscinas", "área de lazer aquática"],
            related_terms: &[
                "piscina", "pool", "natação", "nadar", "água", "limpa", "suja", "aquecida",
                "fria", "gelada",
            ],
            colloquial_variations: &["piscina", "piscininha", "pool"],
            examples: &[
                "piscina estava limpa",
                "água da piscina gelada",
                "piscina aquecida ótima",
            ],
        },
    ),
    (
        "Lazer - Spa",
        KeywordContext {
            synonyms: &["spa", "centro de bem-estar", "wellness"],
            related_terms: &[
                "spa", "massagem", "tratamento", "relaxamento", "bem-estar", "sauna", "jacuzzi",
                "serviço", "qualidade",
            ],
            colloquial_variations: &["spa", "massagem", "tratamento"],
            examples: &["spa excelente", "massagem relaxante", "tratamentos de qualidade"],
        },
    ),
    (
        "Lazer - Academia",
        KeywordContext {
            synonyms: &["gym", "fitness", "sala de musculação"],
            related_terms: &[
                "academia", "gym", "fitness", "musculação", "exercício", "treino",
                "equipamentos", "aparelhos", "esteira", "peso",
            ],
            colloquial_variations: &["academia", "gym", "sala de musculação"],
            examples: &["academia bem equipada", "gym excelente", "equipamentos de qualidade"],
        },
    ),
    // Produto
    (
        "Produto - Transfer",
        KeywordContext {
            synonyms: &["transporte", "traslado", "shuttle"],
            related_terms: &[
                "transfer", "transporte", "traslado", "shuttle", "aeroporto", "van", "ônibus",
                "carro", "motorista", "grátis", "pago",
            ],
            colloquial_variations: &["transfer", "transporte", "traslado"],
            examples: &[
                "transfer do aeroporto eficiente",
                "transporte gratuito",
                "traslado pontual",
            ],
        },
    ),
    (
        "Produto - Acessibilidade",
        KeywordContext {
            synonyms: &["acessível", "adaptado", "PCD"],
            related_terms: &[
                "acessibilidade", "cadeira de rodas", "rampa", "elevador", "adaptado", "PCD",
                "deficiente", "mobilidade",
            ],
            colloquial_variations: &["acessibilidade", "acessível", "adaptado"],
            examples: &["hotel acessível", "rampa de acesso", "quarto adaptado para PCD"],
        },
    ),
    (
        "Produto - Custo-benefício",
        KeywordContext {
            synonyms: &["valor", "preço", "price", "cost"],
            related_terms: &[
                "preço", "valor", "custo", "caro", "barato", "vale a pena", "justo", "injusto",
            ],
            colloquial_variations: &["preço", "valor", "custo-benefício"],
            examples: &["preço justo", "vale muito a pena", "custo-benefício excelente"],
        },
    ),
    (
        "Produto - Localização",
        KeywordContext {
            synonyms: &["location", "posição", "situação", "lugar"],
            related_terms: &[
                "localização", "localizado", "location", "perto", "próximo", "longe",
                "distante", "acesso", "região", "área", "praia", "centro",
            ],
            colloquial_variations: &["localização", "onde fica", "lugar", "bem localizado"],
            examples: &["hotel bem localizado", "localização perfeita", "perto da praia"],
        },
    ),
    (
        "Produto - Vista",
        KeywordContext {
            synonyms: &["view", "panorama", "visão"],
            related_terms: &[
                "vista", "view", "panorama", "paisagem", "mar", "montanha", "bonita", "feia",
                "linda", "maravilhosa",
            ],
            colloquial_variations: &["vista", "view", "paisagem"],
            examples: &["vista para o mar linda", "view maravilhosa", "paisagem bonita"],
        },
    ),
    (
        "Produto - Experiência",
        KeywordContext {
            synonyms: &["estadia", "hospedagem", "stay", "vivência"],
            related_terms: &[
                "experiência", "estadia", "hospedagem", "stay", "gostei", "adorei", "amei",
                "recomendo", "perfeito", "maravilhoso",
            ],
            colloquial_variations: &["experiência", "estadia", "adorei", "amei"],
            examples: &["experiência maravilhosa", "adorei tudo", "estadia perfeita"],
        },
    ),
    (
        "Produto - Modernização",
        KeywordContext {
            synonyms: &["moderno", "atualizado", "novo", "renovado"],
            related_terms: &[
                "moderno", "novo", "atualizado", "renovado", "reforma", "antigo", "velho",
                "ultrapassado", "contemporâneo",
            ],
            colloquial_variations: &["moderno", "novo", "renovado"],
            examples: &["hotel modernizado", "instalações novas", "precisa de reforma"],
        },
    ),
    (
        "Produto - All Inclusive",
        KeywordContext {
            synonyms: &["tudo incluído", "all inclusive", "pensão completa"],
            related_terms: &[
                "all inclusive", "tudo incluído", "pensão completa", "comida", "bebida",
                "atividades", "grátis", "incluído",
            ],
            colloquial_variations: &["all inclusive", "tudo incluído", "incluso"],
            examples: &[
                "sistema all inclusive excelente",
                "tudo incluído vale a pena",
                "comidas e bebidas inclusas",
            ],
        },
    ),
    (
        "Produto - Isolamento Acustico",
        KeywordContext {
            synonyms: &["isolamento acústico", "isolamento sonoro", "insonorização"],
            related_terms: &[
                "barulho", "ruído", "som", "silêncio", "silencioso", "barulhento", "ruidoso",
                "dormir", "descanso",
            ],
            colloquial_variations: &["barulho", "isolamento", "silêncio"],
            examples: &["muito barulho", "falta isolamento acústico", "quarto silencioso"],
        },
    ),
    // Operações
    (
        "Operações - Atendimento",
        KeywordContext {
            synonyms: &["serviço", "service", "staff", "equipe"],
            related_terms: &[
                "atendimento", "serviço", "staff", "equipe", "funcionário", "educado",
                "prestativo", "atencioso", "cordial", "simpático",
            ],
            colloquial_variations: &["atendimento", "funcionários", "staff", "equipe"],
            examples: &[
                "atendimento excelente",
                "equipe muito prestativa",
                "funcionários atenciosos",
            ],
        },
    ),
    (
        "Operações - Cartão de acesso",
        KeywordContext {
            synonyms: &["chave do quarto", "cartão magnético", "keycard"],
            related_terms: &[
                "cartão", "chave", "acesso", "porta", "quarto", "não funciona",
                "desmagnetiza", "perde", "troca",
            ],
            colloquial_variations: &["cartão", "chave", "keycard"],
            examples: &[
                "cartão não funcionava",
                "chave desmagnetizou",
                "precisei trocar o cartão",
            ],
        },
    ),
    (
        "Operações - Acesso ao quarto",
        KeywordContext {
            synonyms: &["entrada no quarto", "acesso acomodação"],
            related_terms: &[
                "acesso", "entrada", "porta", "quarto", "chave", "cartão", "dificuldade",
                "problema", "não consegui",
            ],
            colloquial_variations: &["entrar no quarto", "acesso", "porta"],
            examples: &[
                "dificuldade para entrar no quarto",
                "problema no acesso",
                "porta não abria",
            ],
        },
    ),
    (
        "Operações - Consumo Extra",
        KeywordContext {
            synonyms: &["extras", "adicionais", "serviços extras"],
            related_terms: &[
                "consumo", "extra", "adicional", "cobrança", "conta", "frigobar", "telefone",
                "serviço", "preço",
            ],
            colloquial_variations: &["extras", "consumo", "cobrança extra"],
            examples: &["cobrança de extras", "consumo do frigobar", "serviços adicionais"],
        },
    ),
    // Corporativo
    (
        "Corporativo - Marketing",
        KeywordContext {
            synonyms: &["divulgação", "comunicação", "propaganda"],
            related_terms: &[
                "marketing", "propaganda", "divulgação", "comunicação", "promessa",
                "expectativa", "realidade", "foto", "site",
            ],
            colloquial_variations: &["marketing", "propaganda", "fotos enganosas"],
            examples: &[
                "marketing enganoso",
                "fotos não correspondem",
                "expectativa vs realidade",
            ],
        },
    ),
    (
        "Corporativo - Reservas",
        KeywordContext {
            synonyms: &["booking", "reserva", "agendamento"],
            related_terms: &[
                "reserva", "booking", "agendamento", "confirmação", "cancelamento", "problema",
                "erro", "sistema",
            ],
            colloquial_variations: &["reserva", "booking", "agendamento"],
            examples: &["problema na reserva", "erro no booking", "cancelamento difícil"],
        },
    ),
    (
        "Corporativo - Financeiro",
        KeywordContext {
            synonyms: &["cobrança", "pagamento", "faturamento"],
            related_terms: &[
                "cobrança", "pagamento", "conta", "valor", "preço", "erro", "desconto",
                "reembolso", "cartão",
            ],
            colloquial_variations: &["cobrança", "conta", "pagamento"],
            examples: &[
                "erro na cobrança",
                "valor incorreto na conta",
                "problema no pagamento",
            ],
        },
    ),
    // EG
    (
        "EG - Abordagem",
        KeywordContext {
            synonyms: &["atendimento personalizado", "relacionamento"],
            related_terms: &[
                "abordagem", "tratamento", "relacionamento", "personalizado", "educado",
                "gentil", "atenção", "cuidado", "especial",
            ],
            colloquial_variations: &["abordagem", "tratamento", "atenção"],
            examples: &[
                "abordagem personalizada",
                "tratamento especial",
                "atenção aos detalhes",
            ],
        },
    ),
];

static KEYWORD_CONTEXT_INDEX: Lazy<HashMap<&'static str, &'static KeywordContext>> =
    Lazy::new(|| {
        KEYWORD_CONTEXTS
            .iter()
            .map(|(label, context)| (*label, context))
            .collect()
    });

/// Authored context for a keyword label, if one exists. Exact match only.
pub fn keyword_context(label: &str) -> Option<&'static KeywordContext> {
    KEYWORD_CONTEXT_INDEX.get(label).copied()
}

/// All authored keyword labels, in authoring order.
pub fn authored_keyword_labels() -> impl Iterator<Item = &'static str> {
    KEYWORD_CONTEXTS.iter().map(|(label, _)| *label)
}
