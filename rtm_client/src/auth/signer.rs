//! Assinatura das requisições do Remember The Milk
//!
//! O algoritmo é imposto pela API: parâmetros ordenados pela chave, concatenados
//! como `chave1valor1chave2valor2...`, prefixados pelo shared secret e resumidos
//! com MD5 em hexadecimal minúsculo.
//! <https://www.rememberthemilk.com/services/api/authentication.rtm>

use md5::{Digest, Md5};

/// Nome do parâmetro que carrega a assinatura (nunca entra no conjunto assinado)
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Calcula a assinatura `api_sig` para um conjunto de parâmetros
pub fn sign<'a, I>(secret: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut sorted: Vec<(&String, &String)> = params
        .into_iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_PARAM)
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Md5::new();
    hasher.update(secret.as_bytes());
    for (key, value) in sorted {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }

    hex::encode(hasher.finalize())
}
