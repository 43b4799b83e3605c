use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caixinha_core::users::User;

/// One entry of `usuarios.json`, keyed by username.
///
/// `senha` holds an Argon2 PHC string, or plaintext for users that have not
/// logged in since hashing was introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub nome: String,
    pub senha: String,
    pub telefone: String,
    pub email: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
    #[serde(default)]
    pub contas: Vec<String>,
}

impl UserRecord {
    pub fn into_domain(self, username: &str) -> User {
        User {
            username: username.to_string(),
            display_name: self.nome,
            phone: self.telefone,
            email: self.email,
            national_id: self.cpf,
            birth_date: self.data_nascimento,
            password_hash: self.senha,
            account_numbers: self.contas,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            nome: user.display_name.clone(),
            senha: user.password_hash.clone(),
            telefone: user.phone.clone(),
            email: user.email.clone(),
            cpf: user.national_id.clone(),
            data_nascimento: user.birth_date,
            contas: user.account_numbers.clone(),
        }
    }
}
