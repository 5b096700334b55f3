// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};

use sensorsign_core::{utils::Redact, SigningCredential};

/// Credential for the observation API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Multi-tenant client id, sent base64 encoded in the `Authorization` header.
    pub client_id: String,
    /// Base64 encoded HMAC key.
    pub secret_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(client_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &Redact::from(&self.client_id))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.client_id.is_empty() && !self.secret_key.is_empty()
    }
}
